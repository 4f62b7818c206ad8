//! Single-shot Markdown generation: job ads, interview guides, revisions.
//!
//! No retry chain here; `LlmClient` already retries transport failures.
//! Empty model content comes back as an empty string.

use tracing::info;

use crate::generation::prompts::{
    interview_prompt, job_ad_prompt, refine_prompt, Tone, INTERVIEW_SYSTEM, JOB_AD_SYSTEM,
    REFINE_SYSTEM,
};
use crate::language::Language;
use crate::llm_client::{ChatBackend, ChatRequest, LlmError, LlmProfile};
use crate::schema::VacancyDescription;

async fn complete_text(
    backend: &dyn ChatBackend,
    profile: &LlmProfile,
    system: &str,
    user: &str,
) -> Result<String, LlmError> {
    let request = ChatRequest::new(profile, system, user);
    let response = backend.complete(&request).await?;
    Ok(response.text()?.to_string())
}

pub async fn generate_job_ad(
    backend: &dyn ChatBackend,
    profile: &LlmProfile,
    record: &VacancyDescription,
    tone: Tone,
    lang: Language,
) -> Result<String, LlmError> {
    info!(
        "Generating job ad for '{}' (tone={tone}, lang={lang}, model={})",
        record.position.job_title, profile.model
    );
    let prompt = job_ad_prompt(record, tone, lang);
    complete_text(backend, profile, JOB_AD_SYSTEM, &prompt).await
}

pub async fn generate_interview_guide(
    backend: &dyn ChatBackend,
    profile: &LlmProfile,
    record: &VacancyDescription,
    lang: Language,
) -> Result<String, LlmError> {
    info!(
        "Generating interview guide for '{}' (lang={lang}, model={})",
        record.position.job_title, profile.model
    );
    let prompt = interview_prompt(record, lang);
    complete_text(backend, profile, INTERVIEW_SYSTEM, &prompt).await
}

/// Revises `original` according to free-text `instructions`.
pub async fn refine_document(
    backend: &dyn ChatBackend,
    profile: &LlmProfile,
    original: &str,
    instructions: &str,
    lang: Language,
) -> Result<String, LlmError> {
    let prompt = refine_prompt(original, instructions, lang);
    complete_text(backend, profile, REFINE_SYSTEM, &prompt).await
}
