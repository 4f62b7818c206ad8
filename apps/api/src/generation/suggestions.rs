//! Static skill suggestions keyed on the job title.

const DATA_SKILLS: &[&str] = &["Python", "SQL", "Pandas", "Airflow", "Spark"];
const SOFTWARE_SKILLS: &[&str] = &["Java", "Python", "Git", "Docker", "Kubernetes", "AWS"];
const PRODUCT_SKILLS: &[&str] = &[
    "Roadmapping",
    "Stakeholder Management",
    "Analytics",
    "A/B Testing",
];

const MAX_SUGGESTIONS: usize = 5;

/// Up to five skills from the matching bank that are not in `existing`.
/// "engineer" picks the software bank, "data" the data bank, anything else
/// the product bank.
pub fn suggest_additional_skills(job_title: &str, existing: &[String]) -> Vec<String> {
    let title = job_title.to_lowercase();
    let bank = if title.contains("engineer") {
        SOFTWARE_SKILLS
    } else if title.contains("data") {
        DATA_SKILLS
    } else {
        PRODUCT_SKILLS
    };

    bank.iter()
        .filter(|skill| !existing.iter().any(|have| have == *skill))
        .take(MAX_SUGGESTIONS)
        .map(|skill| skill.to_string())
        .collect()
}
