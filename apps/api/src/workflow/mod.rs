// Session workflow: screen state machine, intake wizard, and the engine that
// runs generations for them.

pub mod clock;
pub mod engine;
pub mod handlers;
pub mod machine;
pub mod status;
pub mod wizard;
