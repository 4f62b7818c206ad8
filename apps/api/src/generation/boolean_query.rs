//! Boolean search string for sourcing candidates. Pure string assembly.

use crate::schema::VacancyDescription;

/// How many skills/tools make it into the query.
const MAX_QUERY_SKILLS: usize = 6;

/// `"<title>" AND ("skill") AND ... AND <location>`; empty parts are dropped.
/// Skills are hard skills followed by tools; location is the primary city,
/// else the company headquarters.
pub fn build_boolean_query(record: &VacancyDescription) -> String {
    let title = &record.position.job_title;
    let title = if title.is_empty() {
        String::new()
    } else {
        format!("\"{title}\"")
    };

    let skills = record
        .requirements
        .hard_skills
        .iter()
        .chain(&record.requirements.tools_and_technologies)
        .take(MAX_QUERY_SKILLS)
        .map(|skill| format!("(\"{skill}\")"))
        .collect::<Vec<_>>()
        .join(" AND ");

    let location = if record.location.primary_city.is_empty() {
        record.company.hq_location.clone()
    } else {
        record.location.primary_city.clone()
    };

    [title, skills, location]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" AND ")
}
