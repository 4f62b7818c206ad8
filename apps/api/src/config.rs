use std::time::Duration;

use anyhow::{Context, Result};

use crate::language::Language;
use crate::llm_client::DEFAULT_BASE_URL;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    /// Model used for structured extraction.
    pub openai_model: String,
    pub port: u16,
    pub rust_log: String,
    pub llm_timeout: Duration,
    pub fetch_timeout: Duration,
    /// Idle time before a wizard session is dropped.
    pub session_ttl: Duration,
    pub default_language: Language,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            openai_api_key: lookup("OPENAI_API_KEY")
                .filter(|v| !v.trim().is_empty())
                .context("Required environment variable 'OPENAI_API_KEY' is not set")?,
            openai_base_url: var("OPENAI_BASE_URL", DEFAULT_BASE_URL),
            openai_model: var("OPENAI_MODEL", "gpt-4o"),
            port: var("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
            llm_timeout: Duration::from_secs(
                var("LLM_TIMEOUT_SECS", "120")
                    .parse::<u64>()
                    .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            fetch_timeout: Duration::from_secs(
                var("FETCH_TIMEOUT_SECS", "12")
                    .parse::<u64>()
                    .context("FETCH_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            session_ttl: Duration::from_secs(
                var("SESSION_TTL_SECS", "14400")
                    .parse::<u64>()
                    .context("SESSION_TTL_SECS must be a whole number of seconds")?,
            ),
            default_language: var("DEFAULT_LANGUAGE", "en")
                .parse::<Language>()
                .map_err(anyhow::Error::msg)
                .context("DEFAULT_LANGUAGE is invalid")?,
        })
    }
}
