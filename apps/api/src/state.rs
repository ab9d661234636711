use crate::config::Config;
use crate::workflow::engine::WorkflowEngine;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// All live sessions and the roadmap client that serves them.
    pub engine: WorkflowEngine,
    pub config: Config,
}
