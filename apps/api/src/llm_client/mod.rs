//! LLM Client: the single point of entry for all chat-completion calls.
//!
//! ARCHITECTURAL RULE: No other module may call the model API directly.
//! Extraction and generation build a `ChatRequest` and hand it to a
//! `ChatBackend`; `LlmClient` is the production backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod profiles;
pub mod prompts;
pub mod repair;
#[cfg(test)]
pub mod testing;

pub use profiles::{GenerationModel, LlmProfile, LlmProfiles, LlmTask};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned no choices")]
    NoChoices,

    #[error("LLM returned no tool call")]
    MissingToolCall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolChoiceFunction {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolChoice {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: ToolChoiceFunction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// A chat-completions request. Built from a task profile, then narrowed with
/// the `with_*` helpers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<ToolChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl ChatRequest {
    pub fn new(profile: &LlmProfile, system: &str, user: &str) -> Self {
        Self {
            model: profile.model.clone(),
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: system.to_string(),
                },
                ChatMessage {
                    role: Role::User,
                    content: user.to_string(),
                },
            ],
            temperature: profile.temperature,
            max_tokens: profile.max_tokens,
            seed: None,
            tools: Vec::new(),
            tool_choice: None,
            response_format: None,
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Asks for a bare JSON object reply (no schema enforcement).
    pub fn json_mode(mut self) -> Self {
        self.response_format = Some(ResponseFormat {
            kind: "json_object",
        });
        self
    }

    /// Offers a single function tool and forces the model to call it.
    pub fn with_forced_tool(mut self, function: FunctionDefinition) -> Self {
        self.tool_choice = Some(ToolChoice {
            kind: "function",
            function: ToolChoiceFunction {
                name: function.name.clone(),
            },
        });
        self.tools = vec![ToolDefinition {
            kind: "function",
            function,
        }];
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: AssistantMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Legacy single-function reply shape.
    #[serde(default)]
    pub function_call: Option<FunctionCall>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCall {
    pub arguments: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    fn first_message(&self) -> Result<&AssistantMessage, LlmError> {
        self.choices
            .first()
            .map(|c| &c.message)
            .ok_or(LlmError::NoChoices)
    }

    /// Text content of the first choice; empty when the model sent none.
    pub fn text(&self) -> Result<&str, LlmError> {
        Ok(self.first_message()?.content.as_deref().unwrap_or(""))
    }

    /// Arguments of the first tool call, falling back to the legacy
    /// `function_call` field.
    pub fn tool_arguments(&self) -> Result<&str, LlmError> {
        let message = self.first_message()?;
        message
            .tool_calls
            .as_ref()
            .and_then(|calls| calls.first())
            .map(|call| call.function.arguments.as_str())
            .or_else(|| message.function_call.as_ref().map(|f| f.arguments.as_str()))
            .ok_or(LlmError::MissingToolCall)
    }
}

/// Anything that can answer a chat-completions request.
///
/// Carried in `AppState` as `Arc<dyn ChatBackend>` so tests can script replies.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError>;
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// OpenAI-compatible chat-completions client with retry logic.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatBackend for LlmClient {
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(self.endpoint())
                .bearer_auth(&self.api_key)
                .json(request)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<OpenAiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let chat_response: ChatResponse = response.json().await?;

            if let Some(usage) = &chat_response.usage {
                debug!(
                    "LLM call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
                    request.model, usage.prompt_tokens, usage.completion_tokens
                );
            }

            return Ok(chat_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}
