//! Structured extraction: free text in, vacancy fields out.
//!
//! Three strategies run in a fixed order and the first one that yields a JSON
//! object wins. Each failure is recorded; only when all three fail does the
//! caller see an error, carrying every diagnostic.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::extraction::prompts::{
    extract_user_prompt, EXTRACT_SYSTEM, EXTRACT_TOOL_DESCRIPTION, EXTRACT_TOOL_NAME,
};
use crate::language::Language;
use crate::llm_client::prompts::JSON_OBJECT_SUFFIX;
use crate::llm_client::repair::{repair_json, stable_seed};
use crate::llm_client::{ChatBackend, ChatRequest, FunctionDefinition, LlmError, LlmProfile};
use crate::schema::json_schema::canonical_json_schema;

pub mod company;
pub mod handlers;
pub mod prompts;
pub mod sources;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Could not parse AI response as JSON. Details: {}", .details.join(" | "))]
    Exhausted { details: Vec<String> },

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("Invalid JSON in model reply: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Why a single strategy attempt failed.
#[derive(Debug, Error)]
enum AttemptError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("{0}")]
    Parse(#[from] serde_json::Error),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Forced function call whose parameters are the canonical JSON Schema.
    ToolCall,
    /// `response_format = json_object`, reply through the repair parser.
    JsonMode,
    /// No format constraint, reply through the repair parser.
    PlainRepair,
}

impl ExtractionStrategy {
    pub const ORDER: [ExtractionStrategy; 3] = [
        ExtractionStrategy::ToolCall,
        ExtractionStrategy::JsonMode,
        ExtractionStrategy::PlainRepair,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ExtractionStrategy::ToolCall => "tool_call",
            ExtractionStrategy::JsonMode => "json_mode",
            ExtractionStrategy::PlainRepair => "repair",
        }
    }

    fn seed_key(self) -> &'static str {
        match self {
            ExtractionStrategy::ToolCall => "extract",
            ExtractionStrategy::JsonMode => "extract-json",
            ExtractionStrategy::PlainRepair => "extract-repair",
        }
    }

    pub fn build_request(self, profile: &LlmProfile, text: &str, lang: Language) -> ChatRequest {
        let user = extract_user_prompt(text, lang);
        let length = text.chars().count().to_string();
        let seed = stable_seed(&[self.seed_key(), &length]);

        match self {
            ExtractionStrategy::ToolCall => ChatRequest::new(profile, EXTRACT_SYSTEM, &user)
                .with_temperature(0.0)
                .with_seed(seed)
                .with_forced_tool(FunctionDefinition {
                    name: EXTRACT_TOOL_NAME.to_string(),
                    description: EXTRACT_TOOL_DESCRIPTION.to_string(),
                    parameters: canonical_json_schema(),
                }),
            ExtractionStrategy::JsonMode => {
                let system = format!("{EXTRACT_SYSTEM}{JSON_OBJECT_SUFFIX}");
                ChatRequest::new(profile, &system, &user)
                    .with_temperature(0.0)
                    .with_seed(seed)
                    .json_mode()
            }
            ExtractionStrategy::PlainRepair => ChatRequest::new(profile, EXTRACT_SYSTEM, &user)
                .with_temperature(0.0)
                .with_seed(seed),
        }
    }

    async fn attempt(
        self,
        backend: &dyn ChatBackend,
        profile: &LlmProfile,
        text: &str,
        lang: Language,
    ) -> Result<Map<String, Value>, AttemptError> {
        let request = self.build_request(profile, text, lang);
        let response = backend.complete(&request).await?;

        let value = match self {
            ExtractionStrategy::ToolCall => serde_json::from_str(response.tool_arguments()?)?,
            ExtractionStrategy::JsonMode | ExtractionStrategy::PlainRepair => {
                repair_json(non_empty_or_object(response.text()?))?
            }
        };
        into_object(value)
    }
}

/// An empty reply is read as an empty object.
pub(crate) fn non_empty_or_object(content: &str) -> &str {
    if content.trim().is_empty() {
        "{}"
    } else {
        content
    }
}

fn into_object(value: Value) -> Result<Map<String, Value>, AttemptError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Array(_) => Err(AttemptError::NotAnObject("an array")),
        Value::String(_) => Err(AttemptError::NotAnObject("a string")),
        Value::Number(_) => Err(AttemptError::NotAnObject("a number")),
        Value::Bool(_) => Err(AttemptError::NotAnObject("a boolean")),
        Value::Null => Err(AttemptError::NotAnObject("null")),
    }
}

/// Runs the strategies in `ExtractionStrategy::ORDER` and returns the first
/// JSON object obtained. The output is raw model data; pass it through
/// `coerce_and_fill` before use.
pub async fn extract_structured(
    backend: &dyn ChatBackend,
    profile: &LlmProfile,
    text: &str,
    lang: Language,
) -> Result<Map<String, Value>, ExtractionError> {
    let mut details = Vec::with_capacity(ExtractionStrategy::ORDER.len());

    for strategy in ExtractionStrategy::ORDER {
        match strategy.attempt(backend, profile, text, lang).await {
            Ok(fields) => {
                info!(
                    "Extraction succeeded via {} ({} top-level keys)",
                    strategy.label(),
                    fields.len()
                );
                return Ok(fields);
            }
            Err(e) => {
                warn!("Extraction strategy {} failed: {e}", strategy.label());
                details.push(format!("[{}] {e}", strategy.label()));
            }
        }
    }

    Err(ExtractionError::Exhausted { details })
}
