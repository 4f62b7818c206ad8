//! Canonical vacancy record: the single shape every extraction, wizard step
//! and generator works against.
//!
//! The nested structs below are the typed view. Mutation always happens on the
//! flat, dotted-key representation (see `flat`), and the nested record is
//! rebuilt from it on demand.

use serde::{Deserialize, Serialize};

pub mod fields;
pub mod flat;
pub mod json_schema;

pub use fields::{FieldKind, FieldPath, Step, CRITICAL_FIELDS};
pub use flat::{coerce_and_fill, flatten, unflatten, FlatRecord};

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {message}")]
    Validation { field: String, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Company {
    pub name: String,
    pub industry: String,
    pub hq_location: String,
    /// Size bucket, e.g. "11-50".
    pub size: String,
    pub website: String,
    pub mission: String,
    pub culture: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub primary_city: String,
    pub country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub job_title: String,
    pub role_summary: String,
    pub department: String,
    pub team_structure: String,
    pub reporting_line: String,
    /// Junior / Mid / Senior / Lead / Head
    pub seniority_level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Responsibilities {
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirements {
    pub hard_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub tools_and_technologies: Vec<String>,
    pub languages_required: Vec<String>,
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Employment {
    /// Full-time / Part-time / Contract / ...
    pub job_type: String,
    /// Onsite / Hybrid / Remote
    pub work_policy: String,
    pub travel_required: bool,
    /// Free text, e.g. "2 days WFH".
    pub remote_policy: String,
    pub travel_details: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Compensation {
    pub salary_provided: bool,
    pub salary_min: f64,
    pub salary_max: f64,
    pub salary_currency: String,
    /// year | month | hour
    pub salary_period: String,
    pub benefits: Vec<String>,
    pub healthcare_plan: String,
    pub pension_plan: String,
    pub variable_pay: bool,
    pub equity_offered: bool,
}

impl Default for Compensation {
    fn default() -> Self {
        Self {
            salary_provided: false,
            salary_min: 0.0,
            salary_max: 0.0,
            salary_currency: "EUR".to_string(),
            salary_period: "year".to_string(),
            benefits: Vec::new(),
            healthcare_plan: String::new(),
            pension_plan: String::new(),
            variable_pay: false,
            equity_offered: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Process {
    pub interview_stages: u32,
    pub process_notes: String,
}

/// The full vacancy description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VacancyDescription {
    pub company: Company,
    pub location: Location,
    pub position: Position,
    pub responsibilities: Responsibilities,
    pub requirements: Requirements,
    pub employment: Employment,
    pub compensation: Compensation,
    pub process: Process,
}
