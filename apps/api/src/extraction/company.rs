//! Company facts scraped from the employer's website.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::extraction::prompts::{company_user_prompt, COMPANY_SYSTEM};
use crate::extraction::sources::PageFetcher;
use crate::extraction::{non_empty_or_object, ExtractionError};
use crate::language::Language;
use crate::llm_client::repair::{repair_json, stable_seed};
use crate::llm_client::{ChatBackend, ChatRequest, LlmProfile};

/// Page text beyond this many characters is not sent to the model.
pub const PAGE_TEXT_LIMIT: usize = 10_000;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyInfo {
    pub name: String,
    pub website: String,
    pub hq_location: String,
    pub city: String,
    pub country: String,
    pub mission: String,
    pub culture: String,
}

impl CompanyInfo {
    /// Reads the known keys leniently: numbers become text, anything else
    /// that is not a string is treated as missing.
    pub fn from_value(value: &Value) -> Self {
        let field = |key: &str| match value.get(key) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        Self {
            name: field("name"),
            website: field("website"),
            hq_location: field("hq_location"),
            city: field("city"),
            country: field("country"),
            mission: field("mission"),
            culture: field("culture"),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Fetches `url` and asks the model for company facts.
///
/// A page that yields no text gives an empty result without a model call.
/// Otherwise one JSON-mode call is made, with a single plain fallback whose
/// failure is returned.
pub async fn extract_company_info(
    backend: &dyn ChatBackend,
    fetcher: &PageFetcher,
    profile: &LlmProfile,
    url: &str,
    lang: Language,
) -> Result<CompanyInfo, ExtractionError> {
    let page_text = fetcher.fetch_text(url).await;
    if page_text.is_empty() {
        info!("No page text for {url}; skipping company extraction");
        return Ok(CompanyInfo::default());
    }
    company_info_from_text(backend, profile, &page_text, url, lang).await
}

pub async fn company_info_from_text(
    backend: &dyn ChatBackend,
    profile: &LlmProfile,
    page_text: &str,
    url: &str,
    lang: Language,
) -> Result<CompanyInfo, ExtractionError> {
    let truncated: String = page_text.chars().take(PAGE_TEXT_LIMIT).collect();
    let user = company_user_prompt(&truncated, url, lang);

    let json_request = ChatRequest::new(profile, COMPANY_SYSTEM, &user)
        .with_seed(stable_seed(&["company", url]))
        .json_mode();

    match request_json(backend, &json_request).await {
        Ok(value) => return Ok(CompanyInfo::from_value(&value)),
        Err(e) => warn!("Company info JSON mode failed for {url}: {e}; retrying without format"),
    }

    let plain_request = ChatRequest::new(profile, COMPANY_SYSTEM, &user)
        .with_seed(stable_seed(&["company2", url]));
    let value = request_json(backend, &plain_request).await?;
    Ok(CompanyInfo::from_value(&value))
}

async fn request_json(
    backend: &dyn ChatBackend,
    request: &ChatRequest,
) -> Result<Value, ExtractionError> {
    let response = backend.complete(request).await?;
    Ok(repair_json(non_empty_or_object(response.text()?))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{api_error, text_response, ScriptedBackend};
    use crate::llm_client::{LlmProfiles, LlmTask};
    use serde_json::json;
    use std::time::Duration;

    fn profile() -> LlmProfile {
        LlmProfiles::default().get(LlmTask::CompanyInfo)
    }

    #[test]
    fn test_from_value_is_lenient() {
        let info = CompanyInfo::from_value(&json!({
            "name": " Acme ",
            "city": null,
            "country": ["DE"],
            "hq_location": 10115,
            "unrelated": "x"
        }));
        assert_eq!(info.name, "Acme");
        assert_eq!(info.city, "");
        assert_eq!(info.country, "");
        assert_eq!(info.hq_location, "10115");
        assert!(!info.is_empty());
        assert!(CompanyInfo::from_value(&json!({})).is_empty());
    }

    #[tokio::test]
    async fn test_json_mode_reply_is_used() {
        let backend = ScriptedBackend::new(vec![Ok(text_response(
            r#"{"name": "Acme", "city": "Berlin", "mission": "Rockets for everyone"}"#,
        ))]);

        let info = company_info_from_text(
            &backend,
            &profile(),
            "Acme builds rockets in Berlin.",
            "https://acme.example",
            Language::En,
        )
        .await
        .unwrap();

        assert_eq!(info.name, "Acme");
        assert_eq!(info.city, "Berlin");
        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].seed, Some(2005233860));
        assert_eq!(requests[0].model, "gpt-4o-mini");
        assert!(requests[0].response_format.is_some());
    }

    #[tokio::test]
    async fn test_plain_fallback_after_json_mode_failure() {
        let backend = ScriptedBackend::new(vec![
            Err(api_error(400, "response_format unsupported")),
            Ok(text_response("```json\n{\"name\": \"Acme\",}\n```")),
        ]);

        let info = company_info_from_text(
            &backend,
            &profile(),
            "Acme",
            "https://acme.example",
            Language::En,
        )
        .await
        .unwrap();

        assert_eq!(info.name, "Acme");
        let requests = backend.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[1].response_format.is_none());
        assert_ne!(requests[1].seed, requests[0].seed);
    }

    #[tokio::test]
    async fn test_second_failure_is_returned() {
        let backend = ScriptedBackend::new(vec![
            Ok(text_response("nope")),
            Ok(text_response("still nope")),
        ]);
        let result =
            company_info_from_text(&backend, &profile(), "Acme", "https://a.example", Language::En)
                .await;
        assert!(matches!(result, Err(ExtractionError::Parse(_))));
    }

    #[tokio::test]
    async fn test_page_text_is_truncated() {
        let backend = ScriptedBackend::new(vec![Ok(text_response("{}"))]);
        let page = "a".repeat(PAGE_TEXT_LIMIT + 500);

        company_info_from_text(&backend, &profile(), &page, "https://a.example", Language::De)
            .await
            .unwrap();

        let user = &backend.requests()[0].messages[1].content;
        assert!(user.contains(&"a".repeat(PAGE_TEXT_LIMIT)));
        assert!(!user.contains(&"a".repeat(PAGE_TEXT_LIMIT + 1)));
        assert!(user.ends_with("URL: https://a.example\nLanguage: de"));
    }

    #[tokio::test]
    async fn test_unreachable_site_skips_the_model() {
        let backend = ScriptedBackend::default();
        let fetcher = PageFetcher::new(Duration::from_millis(200)).unwrap();

        let info = extract_company_info(
            &backend,
            &fetcher,
            &profile(),
            "http://127.0.0.1:9/",
            Language::En,
        )
        .await
        .unwrap();

        assert!(info.is_empty());
        assert_eq!(backend.call_count(), 0);
    }
}
