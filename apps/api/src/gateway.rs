//! Model-facing operations behind one handle.
//!
//! Route handlers never touch `ChatBackend` directly; they go through
//! `LlmGateway`, which picks the task profile for every call.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::extraction::company::{extract_company_info, CompanyInfo};
use crate::extraction::sources::PageFetcher;
use crate::extraction::{extract_structured, ExtractionError};
use crate::generation::generator::{generate_interview_guide, generate_job_ad, refine_document};
use crate::generation::prompts::Tone;
use crate::language::Language;
use crate::llm_client::{ChatBackend, GenerationModel, LlmError, LlmProfile, LlmProfiles, LlmTask};
use crate::schema::VacancyDescription;

#[derive(Clone)]
pub struct LlmGateway {
    backend: Arc<dyn ChatBackend>,
    profiles: LlmProfiles,
    fetcher: PageFetcher,
}

impl LlmGateway {
    pub fn new(backend: Arc<dyn ChatBackend>, profiles: LlmProfiles, fetcher: PageFetcher) -> Self {
        Self {
            backend,
            profiles,
            fetcher,
        }
    }

    fn profile(&self, task: LlmTask, model: Option<GenerationModel>) -> LlmProfile {
        let mut profile = self.profiles.get(task);
        if let Some(model) = model {
            profile.model = model.as_str().to_string();
        }
        profile
    }

    pub fn fetcher(&self) -> &PageFetcher {
        &self.fetcher
    }

    pub async fn extract(
        &self,
        text: &str,
        lang: Language,
    ) -> Result<Map<String, Value>, ExtractionError> {
        let profile = self.profile(LlmTask::Extract, None);
        extract_structured(self.backend.as_ref(), &profile, text, lang).await
    }

    pub async fn company_info(
        &self,
        url: &str,
        lang: Language,
    ) -> Result<CompanyInfo, ExtractionError> {
        let profile = self.profile(LlmTask::CompanyInfo, None);
        extract_company_info(self.backend.as_ref(), &self.fetcher, &profile, url, lang).await
    }

    pub async fn job_ad(
        &self,
        record: &VacancyDescription,
        tone: Tone,
        lang: Language,
        model: Option<GenerationModel>,
    ) -> Result<String, LlmError> {
        let profile = self.profile(LlmTask::JobAd, model);
        generate_job_ad(self.backend.as_ref(), &profile, record, tone, lang).await
    }

    pub async fn interview_guide(
        &self,
        record: &VacancyDescription,
        lang: Language,
        model: Option<GenerationModel>,
    ) -> Result<String, LlmError> {
        let profile = self.profile(LlmTask::Interview, model);
        generate_interview_guide(self.backend.as_ref(), &profile, record, lang).await
    }

    pub async fn refine(
        &self,
        original: &str,
        instructions: &str,
        lang: Language,
    ) -> Result<String, LlmError> {
        let profile = self.profile(LlmTask::Refine, None);
        refine_document(self.backend.as_ref(), &profile, original, instructions, lang).await
    }
}
