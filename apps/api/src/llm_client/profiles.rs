//! Per-task model settings. Every model call picks its profile here; nothing
//! else hardcodes a model name or sampling temperature.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmTask {
    Extract,
    CompanyInfo,
    JobAd,
    Interview,
    Refine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmProfile {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Models a caller may pick for job-ad and interview-guide generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationModel {
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "gpt-4.1")]
    Gpt41,
    #[serde(rename = "gpt-4o-mini")]
    Gpt4oMini,
}

impl GenerationModel {
    pub fn as_str(self) -> &'static str {
        match self {
            GenerationModel::Gpt4o => "gpt-4o",
            GenerationModel::Gpt41 => "gpt-4.1",
            GenerationModel::Gpt4oMini => "gpt-4o-mini",
        }
    }
}

/// The profile table. Only the extraction model is configurable.
#[derive(Debug, Clone)]
pub struct LlmProfiles {
    extract_model: String,
}

impl LlmProfiles {
    pub fn new(extract_model: impl Into<String>) -> Self {
        Self {
            extract_model: extract_model.into(),
        }
    }

    pub fn get(&self, task: LlmTask) -> LlmProfile {
        let (model, temperature, max_tokens) = match task {
            LlmTask::Extract => (self.extract_model.as_str(), 0.0, 1500),
            LlmTask::CompanyInfo => ("gpt-4o-mini", 0.15, 700),
            LlmTask::JobAd => ("gpt-4o", 0.55, 1200),
            LlmTask::Interview => ("gpt-4o", 0.5, 1100),
            LlmTask::Refine => ("gpt-4o", 0.5, 900),
        };
        LlmProfile {
            model: model.to_string(),
            temperature,
            max_tokens,
        }
    }
}

impl Default for LlmProfiles {
    fn default() -> Self {
        Self::new("gpt-4o")
    }
}
