//! Scripted in-memory `GenerativeModel` for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use super::{CompletionRequest, ContentPart, GenerativeModel, LlmError};

/// Replies with queued results in order and records every request's parts.
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<Vec<ContentPart>>>,
    gate: Option<Semaphore>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Like `new`, but each reply is held until `release` is called.
    pub fn gated(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new(replies)
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<Vec<ContentPart>> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn api_failure(status: u16) -> LlmError {
    LlmError::Api {
        status,
        message: "scripted failure".to_string(),
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(request.parts.to_vec());
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(api_failure(500)))
    }
}
