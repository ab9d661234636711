// Roadmap generation pipeline.
// Profile → prompt parts → one schema-constrained model call → validated RoadmapResult.
// All model calls go through llm_client; no direct HTTP calls here.

pub mod builder;
pub mod client;
pub mod models;
pub mod prompts;
pub mod report;
pub mod sample;
pub mod schema;
