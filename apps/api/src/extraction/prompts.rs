// Prompt constants for vacancy and company extraction.

use crate::language::Language;

/// Shared by all three extraction strategies.
pub const EXTRACT_SYSTEM: &str = "You are a strict extraction engine. \
    Return ONLY structured data as function arguments matching the given JSON schema.";

pub const EXTRACT_TOOL_NAME: &str = "vacancy_extract";
pub const EXTRACT_TOOL_DESCRIPTION: &str = "Return all fields for VacancyDescription";

pub const COMPANY_SYSTEM: &str = "Extract company facts. Return a strict JSON with \
    {name, website, hq_location, city, country, mission, culture}. \
    Do not invent; leave empty if not found.";

pub fn extract_user_prompt(text: &str, lang: Language) -> String {
    format!("Extract all vacancy fields from the following text. Language hint: {lang}\n\n{text}")
}

pub fn company_user_prompt(page_text: &str, url: &str, lang: Language) -> String {
    format!("WEBSITE TEXT:\n{page_text}\n\nURL: {url}\nLanguage: {lang}")
}
