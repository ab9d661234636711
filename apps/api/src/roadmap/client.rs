//! Roadmap Client: one schema-constrained model call per roadmap.
//!
//! Flow: build_prompt → model.complete → strip fences → JSON parse →
//!       schema validation → typed `RoadmapResult`.
//!
//! All-or-nothing: any failure along the way fails the whole generation. The
//! client does not retry, cache or time out on its own; retry belongs to the
//! workflow (`error --retry--> processing`).

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::{strip_json_fences, CompletionRequest, GenerativeModel, LlmError, MODEL};
use crate::models::profile::Profile;
use crate::roadmap::builder::build_prompt;
use crate::roadmap::models::RoadmapResult;
use crate::roadmap::prompts::ROADMAP_SYSTEM;
use crate::roadmap::schema::{roadmap_schema, SchemaViolation};

/// Shown to the user for every generation failure. Technical causes only go to the log.
pub const GENERATION_FAILED_MESSAGE: &str = "We couldn't generate your roadmap. Please check \
    your connection or try entering more detailed info.";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generative model call failed: {0}")]
    Model(#[from] LlmError),

    #[error("Generative model returned an empty reply")]
    EmptyReply,

    #[error("Reply is not valid roadmap JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Reply does not match the roadmap schema {0}")]
    SchemaMismatch(#[from] SchemaViolation),
}

impl GenerationError {
    pub fn user_message(&self) -> &'static str {
        GENERATION_FAILED_MESSAGE
    }
}

#[derive(Clone)]
pub struct RoadmapClient {
    model: Arc<dyn GenerativeModel>,
}

impl RoadmapClient {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    /// Generates a roadmap for `profile` with exactly one model call.
    pub async fn generate(&self, profile: &Profile) -> Result<RoadmapResult, GenerationError> {
        let parts = build_prompt(profile);
        let request = CompletionRequest {
            model: MODEL,
            parts: &parts,
            schema: roadmap_schema(),
            system_instruction: ROADMAP_SYSTEM,
        };

        info!(
            "Requesting roadmap: {} -> {} ({} parts)",
            profile.current_role,
            profile.target_role,
            parts.len()
        );

        let text = self.model.complete(&request).await?;
        parse_roadmap(&text).inspect_err(|e| warn!("Discarding model reply: {e}"))
    }
}

/// Parses and validates raw reply text into a `RoadmapResult`.
pub fn parse_roadmap(text: &str) -> Result<RoadmapResult, GenerationError> {
    let text = strip_json_fences(text);
    if text.is_empty() {
        return Err(GenerationError::EmptyReply);
    }

    let value: Value = serde_json::from_str(text)?;
    roadmap_schema().validate(&value)?;
    Ok(serde_json::from_value(value)?)
}
