//! One user's pass through the intake wizard.
//!
//! The flat, dotted-key state is the only mutable copy of the vacancy; the
//! nested record is rebuilt from it whenever a summary or generator needs it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::extraction::company::CompanyInfo;
use crate::language::Language;
use crate::questions::{list_missing_critical, missing_fields};
use crate::schema::flat::{defaults, split_lines};
use crate::schema::{
    flatten, unflatten, FieldKind, FieldPath, FlatRecord, SchemaError, Step, VacancyDescription,
};
use crate::wizard::summary::SessionSummary;

#[derive(Debug, Error)]
pub enum WizardError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Please fill critical fields: {}", join_fields(.missing))]
    Blocked { step: Step, missing: Vec<FieldPath> },

    #[error("Please provide a file or URL or job title text.")]
    NoDiscoveryInput,

    #[error("{0} is not a list field")]
    NotAList(FieldPath),

    #[error("List item cannot be empty")]
    EmptyItem,
}

fn join_fields(fields: &[FieldPath]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn trim_text(value: Value) -> Value {
    match value {
        Value::String(text) => Value::String(text.trim().to_string()),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(text) => {
                        let text = text.trim();
                        (!text.is_empty()).then(|| Value::String(text.to_string()))
                    }
                    other => Some(other),
                })
                .collect(),
        ),
        other => other,
    }
}

/// What the discovery step should do next.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoveryInput {
    /// Run extraction over this text.
    Extract(String),
    /// Nothing to extract; the user continues by hand.
    ManualEntry,
}

#[derive(Debug, Clone, Serialize)]
pub struct WizardSession {
    pub id: Uuid,
    pub language: Language,
    pub step: Step,
    pub state: FlatRecord,
    pub extraction_complete: bool,
    pub job_ad: Option<String>,
    pub interview_guide: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WizardSession {
    pub fn new(language: Language) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            language,
            step: Step::Welcome,
            state: defaults(),
            extraction_complete: false,
            job_ad: None,
            interview_guide: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn value(&self, field: FieldPath) -> Option<&Value> {
        self.state.get(field.as_str())
    }

    pub fn text(&self, field: FieldPath) -> &str {
        self.value(field).and_then(Value::as_str).unwrap_or("")
    }

    /// Assigns dotted keys directly. Every key and value is checked before
    /// anything is written, so a bad entry leaves the state untouched.
    /// Text is stored trimmed; blank list items are dropped.
    pub fn set_fields(&mut self, values: &Map<String, Value>) -> Result<(), WizardError> {
        let mut checked = Vec::with_capacity(values.len());
        for (key, value) in values {
            let field: FieldPath = key.parse()?;
            let value = match (field.kind(), value) {
                (FieldKind::TextList, Value::String(text)) => {
                    Value::Array(split_lines(text).into_iter().map(Value::String).collect())
                }
                _ => trim_text(field.coerce(value)?),
            };
            checked.push((field, value));
        }
        for (field, value) in checked {
            self.state.insert(field.as_str().to_string(), value);
        }
        self.touch();
        Ok(())
    }

    /// Appends a trimmed item to a list field and returns the new list.
    pub fn add_list_item(
        &mut self,
        field: FieldPath,
        item: &str,
    ) -> Result<Vec<String>, WizardError> {
        if field.kind() != FieldKind::TextList {
            return Err(WizardError::NotAList(field));
        }
        let item = item.trim();
        if item.is_empty() {
            return Err(WizardError::EmptyItem);
        }
        let mut items: Vec<String> = self
            .value(field)
            .and_then(Value::as_array)
            .map(|values| {
                values
                    .iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();
        items.push(item.to_string());
        self.state.insert(
            field.as_str().to_string(),
            Value::Array(items.iter().cloned().map(Value::String).collect()),
        );
        self.touch();
        Ok(items)
    }

    /// Records a job title typed on the welcome step and decides how
    /// discovery proceeds for the gathered document/URL text.
    pub fn prepare_discovery(
        &mut self,
        raw_text: &str,
        job_title: Option<&str>,
    ) -> Result<DiscoveryInput, WizardError> {
        if let Some(title) = job_title.map(str::trim).filter(|t| !t.is_empty()) {
            self.state.insert(
                FieldPath::JobTitle.as_str().to_string(),
                Value::String(title.to_string()),
            );
            self.touch();
        }

        if !raw_text.trim().is_empty() {
            return Ok(DiscoveryInput::Extract(raw_text.to_string()));
        }
        if self.text(FieldPath::JobTitle).trim().is_empty() {
            return Err(WizardError::NoDiscoveryInput);
        }
        self.step = Step::Company;
        Ok(DiscoveryInput::ManualEntry)
    }

    /// Replaces the state with an extracted record and moves to the first
    /// form step. A job title already in the state survives when the record
    /// has none.
    pub fn apply_extraction(&mut self, record: &VacancyDescription) {
        let welcome_title = self.text(FieldPath::JobTitle).to_string();
        let mut state = flatten(record);
        if record.position.job_title.trim().is_empty() && !welcome_title.is_empty() {
            state.insert(
                FieldPath::JobTitle.as_str().to_string(),
                Value::String(welcome_title),
            );
        }
        self.state = state;
        self.extraction_complete = true;
        self.step = Step::Company;
        self.touch();
    }

    /// Copies non-empty company facts onto the company/location fields.
    /// Returns the fields that were written.
    pub fn apply_company_info(&mut self, url: &str, info: &CompanyInfo) -> Vec<FieldPath> {
        let website = if info.website.is_empty() {
            url
        } else {
            info.website.as_str()
        };
        let mapping = [
            (FieldPath::CompanyName, info.name.as_str()),
            (FieldPath::CompanyWebsite, website),
            (FieldPath::CompanyHqLocation, info.hq_location.as_str()),
            (FieldPath::PrimaryCity, info.city.as_str()),
            (FieldPath::Country, info.country.as_str()),
            (FieldPath::CompanyMission, info.mission.as_str()),
            (FieldPath::CompanyCulture, info.culture.as_str()),
        ];

        let mut written = Vec::new();
        for (field, value) in mapping {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            self.state
                .insert(field.as_str().to_string(), Value::String(value.to_string()));
            written.push(field);
        }
        if !written.is_empty() {
            self.touch();
        }
        written
    }

    /// Critical fields of the current step that are still empty.
    pub fn missing_for_step(&self) -> Vec<FieldPath> {
        missing_fields(&self.state, &self.step.fields())
    }

    /// Moves one step forward unless a critical field of the current step is
    /// empty. Leaving Welcome is always allowed; Summary is the last step.
    pub fn advance(&mut self) -> Result<Step, WizardError> {
        let Some(next) = self.step.next() else {
            return Ok(self.step);
        };
        if self.step != Step::Welcome {
            let missing = self.missing_for_step();
            if !missing.is_empty() {
                debug!("Session {} blocked on {:?}: {missing:?}", self.id, self.step);
                return Err(WizardError::Blocked {
                    step: self.step,
                    missing,
                });
            }
        }
        self.step = next;
        self.touch();
        Ok(next)
    }

    /// Moves one step back, never returning to Welcome once past it.
    pub fn retreat(&mut self) -> Step {
        if self.step > Step::Company {
            if let Some(previous) = self.step.previous() {
                self.step = previous;
                self.touch();
            }
        }
        self.step
    }

    pub fn record(&self) -> Result<VacancyDescription, SchemaError> {
        unflatten(&self.state)
    }

    pub fn missing_critical(&self) -> Vec<FieldPath> {
        list_missing_critical(&self.state)
    }

    pub fn summary(&self) -> Result<SessionSummary, SchemaError> {
        let record = self.record()?;
        Ok(SessionSummary::new(
            record,
            self.missing_critical(),
            self.job_ad.clone(),
            self.interview_guide.clone(),
        ))
    }
}
