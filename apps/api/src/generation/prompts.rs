// Prompt builders for the Generation module.
// Pure functions: a vacancy record in, prompt text out. No model calls here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::llm_client::prompts::{language_line, INCLUSIVE_LANGUAGE_INSTRUCTION};
use crate::schema::VacancyDescription;

pub const JOB_AD_SYSTEM: &str = "You are a professional HR copywriter.";

pub const INTERVIEW_SYSTEM: &str = "You are an expert interviewer.";

pub const REFINE_SYSTEM: &str = "Revise the given document according to the instructions. \
    Keep Markdown. Do not add unrelated content.";

/// Writing style requested for a job ad.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Neutral,
    Formal,
    Creative,
    Inclusive,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Neutral => "neutral",
            Tone::Formal => "formal",
            Tone::Creative => "creative",
            Tone::Inclusive => "inclusive",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Joins at most `limit` items, or returns `None` when there are none.
fn joined(items: &[String], limit: usize, separator: &str) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        Some(items.iter().take(limit).cloned().collect::<Vec<_>>().join(separator))
    }
}

/// "52000-65000 EUR/year", or `None` when no salary is published.
pub fn salary_line(record: &VacancyDescription) -> Option<String> {
    let comp = &record.compensation;
    if !comp.salary_provided || (comp.salary_min == 0.0 && comp.salary_max == 0.0) {
        return None;
    }
    Some(format!(
        "{:.0}-{:.0} {}/{}",
        comp.salary_min, comp.salary_max, comp.salary_currency, comp.salary_period
    ))
}

/// The "Details" bullets of a job ad prompt; empty fields are left out.
pub fn job_ad_details(record: &VacancyDescription) -> Vec<String> {
    let mut details = Vec::new();
    let VacancyDescription {
        company,
        location,
        position,
        responsibilities,
        requirements,
        employment,
        compensation,
        ..
    } = record;

    if !company.name.is_empty() {
        details.push(format!("Company: {}", company.name));
    }
    if !position.job_title.is_empty() {
        details.push(format!("Role: {}", position.job_title));
    }
    let place: Vec<&str> = [location.primary_city.as_str(), location.country.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect();
    if !place.is_empty() {
        details.push(format!("Location: {}", place.join(", ")));
    }
    if !position.role_summary.is_empty() {
        details.push(format!("Summary: {}", position.role_summary));
    }
    if let Some(items) = joined(&responsibilities.items, 10, "; ") {
        details.push(format!("Responsibilities: {items}"));
    }
    if let Some(skills) = joined(&requirements.hard_skills, 12, ", ") {
        details.push(format!("Hard Skills: {skills}"));
    }
    if let Some(skills) = joined(&requirements.soft_skills, 8, ", ") {
        details.push(format!("Soft Skills: {skills}"));
    }
    if let Some(benefits) = joined(&compensation.benefits, 10, ", ") {
        details.push(format!("Benefits: {benefits}"));
    }
    if !employment.work_policy.trim().is_empty() {
        let policy = if employment.remote_policy.is_empty() {
            employment.work_policy.clone()
        } else {
            format!("{} ({})", employment.work_policy, employment.remote_policy)
        };
        details.push(format!("Work Policy: {policy}"));
    }
    if employment.travel_required {
        let travel = if employment.travel_details.is_empty() {
            "Yes"
        } else {
            employment.travel_details.as_str()
        };
        details.push(format!("Travel: {travel}"));
    }
    if let Some(salary) = salary_line(record) {
        details.push(format!("Salary: {salary}"));
    }
    if !company.mission.is_empty() {
        details.push(format!("Mission: {}", company.mission));
    }
    if !company.culture.is_empty() {
        details.push(format!("Culture: {}", company.culture));
    }
    details
}

pub fn job_ad_prompt(record: &VacancyDescription, tone: Tone, lang: Language) -> String {
    let details = job_ad_details(record);
    format!(
        "You are an HR copywriter.\n{}\nTone: {tone}\n\
         Create a modern, inclusive job ad in Markdown. {INCLUSIVE_LANGUAGE_INSTRUCTION}\n\
         Use sections: About, Responsibilities, Requirements, Benefits, How to apply.\n\
         Details:\n- {}",
        language_line(lang.code()),
        details.join("\n- ")
    )
}

pub fn interview_prompt(record: &VacancyDescription, lang: Language) -> String {
    let dash = || "—".to_string();
    let hard = joined(&record.requirements.hard_skills, 10, ", ").unwrap_or_else(dash);
    let soft = joined(&record.requirements.soft_skills, 8, ", ").unwrap_or_else(dash);
    let resp = joined(&record.responsibilities.items, 8, "; ").unwrap_or_else(dash);
    format!(
        "Create an interview guide.\n{}\nJob Title: {}\nResponsibilities: {resp}\n\
         Hard Skills: {hard}\nSoft Skills: {soft}\n\
         Return a Markdown document with sections and evaluation criteria.",
        language_line(lang.code()),
        record.position.job_title
    )
}

pub fn refine_prompt(original: &str, instructions: &str, lang: Language) -> String {
    format!(
        "{}\n=== ORIGINAL START ===\n{original}\n=== ORIGINAL END ===\nInstructions:\n{instructions}",
        language_line(lang.code())
    )
}
