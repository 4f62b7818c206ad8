// Scripted chat backend for unit and router tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use super::{ChatBackend, ChatRequest, ChatResponse, LlmError};

/// Replays queued results in order and records every request it receives.
/// An exhausted script answers with `LlmError::NoChoices`.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<ChatResponse, LlmError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<Result<ChatResponse, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::NoChoices))
    }
}

pub fn text_response(content: &str) -> ChatResponse {
    serde_json::from_value(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
    .unwrap()
}

pub fn tool_response(arguments: &str) -> ChatResponse {
    serde_json::from_value(json!({
        "choices": [{"message": {
            "role": "assistant",
            "content": null,
            "tool_calls": [{
                "id": "call_1",
                "type": "function",
                "function": {"name": "vacancy_extract", "arguments": arguments}
            }]
        }}]
    }))
    .unwrap()
}

pub fn api_error(status: u16, message: &str) -> LlmError {
    LlmError::Api {
        status,
        message: message.to_string(),
    }
}
