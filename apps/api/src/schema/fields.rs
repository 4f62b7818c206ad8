//! Field table: every leaf of `VacancyDescription` as a typed `FieldPath`.
//!
//! The dotted path string is kept for serialization (flat state keys, model
//! output, API payloads); everything else addresses fields through the enum.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::language::Language;
use crate::schema::SchemaError;

/// Value shape of a leaf field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    TextList,
    Flag,
    Decimal,
    Count,
}

impl FieldKind {
    pub fn zero_value(self) -> Value {
        match self {
            FieldKind::Text => Value::String(String::new()),
            FieldKind::TextList => Value::Array(Vec::new()),
            FieldKind::Flag => Value::Bool(false),
            FieldKind::Decimal => Value::from(0.0_f64),
            FieldKind::Count => Value::from(0_u32),
        }
    }
}

/// Wizard steps, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Welcome,
    Company,
    Role,
    Responsibilities,
    Requirements,
    Compensation,
    Process,
    Summary,
}

impl Step {
    pub const ALL: [Step; 8] = [
        Step::Welcome,
        Step::Company,
        Step::Role,
        Step::Responsibilities,
        Step::Requirements,
        Step::Compensation,
        Step::Process,
        Step::Summary,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Step> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Option<Step> {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Option<Step> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Fields edited on this step, in schema order. Welcome and Summary own none.
    pub fn fields(self) -> Vec<FieldPath> {
        FieldPath::ALL
            .iter()
            .copied()
            .filter(|f| f.step() == self)
            .collect()
    }

    pub fn title(self, lang: Language) -> &'static str {
        match (self, lang) {
            (Step::Welcome, Language::En) => "Start Your Analysis",
            (Step::Welcome, Language::De) => "Analyse starten",
            (Step::Company, Language::En) => "Company Information",
            (Step::Company, Language::De) => "Firmeninformationen",
            (Step::Role, Language::En) => "Role Description",
            (Step::Role, Language::De) => "Rollenbeschreibung",
            (Step::Responsibilities, Language::En) => "Responsibilities",
            (Step::Responsibilities, Language::De) => "Verantwortlichkeiten",
            (Step::Requirements, Language::En) => "Requirements",
            (Step::Requirements, Language::De) => "Anforderungen",
            (Step::Compensation, Language::En) => "Employment & Compensation",
            (Step::Compensation, Language::De) => "Anstellung & Vergütung",
            (Step::Process, Language::En) => "Hiring Process",
            (Step::Process, Language::De) => "Einstellungsprozess",
            (Step::Summary, Language::En) => "Summary & Outputs",
            (Step::Summary, Language::De) => "Zusammenfassung & Ergebnisse",
        }
    }
}

macro_rules! field_table {
    ($( $variant:ident => $path:literal, $kind:ident, $step:ident; )*) => {
        /// One variant per leaf field of `VacancyDescription`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum FieldPath {
            $( $variant, )*
        }

        impl FieldPath {
            /// Every field, in schema order.
            pub const ALL: &'static [FieldPath] = &[ $( FieldPath::$variant, )* ];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $( FieldPath::$variant => $path, )*
                }
            }

            pub const fn kind(self) -> FieldKind {
                match self {
                    $( FieldPath::$variant => FieldKind::$kind, )*
                }
            }

            pub const fn step(self) -> Step {
                match self {
                    $( FieldPath::$variant => Step::$step, )*
                }
            }
        }

        impl FromStr for FieldPath {
            type Err = SchemaError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $path => Ok(FieldPath::$variant), )*
                    other => Err(SchemaError::UnknownField(other.to_string())),
                }
            }
        }
    };
}

field_table! {
    CompanyName => "company.name", Text, Company;
    CompanyIndustry => "company.industry", Text, Company;
    CompanyHqLocation => "company.hq_location", Text, Company;
    CompanySize => "company.size", Text, Company;
    CompanyWebsite => "company.website", Text, Company;
    CompanyMission => "company.mission", Text, Company;
    CompanyCulture => "company.culture", Text, Company;
    PrimaryCity => "location.primary_city", Text, Company;
    Country => "location.country", Text, Company;
    JobTitle => "position.job_title", Text, Role;
    RoleSummary => "position.role_summary", Text, Role;
    Department => "position.department", Text, Role;
    TeamStructure => "position.team_structure", Text, Role;
    ReportingLine => "position.reporting_line", Text, Role;
    SeniorityLevel => "position.seniority_level", Text, Role;
    Responsibilities => "responsibilities.items", TextList, Responsibilities;
    HardSkills => "requirements.hard_skills", TextList, Requirements;
    SoftSkills => "requirements.soft_skills", TextList, Requirements;
    ToolsAndTechnologies => "requirements.tools_and_technologies", TextList, Requirements;
    LanguagesRequired => "requirements.languages_required", TextList, Requirements;
    Certifications => "requirements.certifications", TextList, Requirements;
    JobType => "employment.job_type", Text, Compensation;
    WorkPolicy => "employment.work_policy", Text, Compensation;
    TravelRequired => "employment.travel_required", Flag, Compensation;
    RemotePolicy => "employment.remote_policy", Text, Compensation;
    TravelDetails => "employment.travel_details", Text, Compensation;
    SalaryProvided => "compensation.salary_provided", Flag, Compensation;
    SalaryMin => "compensation.salary_min", Decimal, Compensation;
    SalaryMax => "compensation.salary_max", Decimal, Compensation;
    SalaryCurrency => "compensation.salary_currency", Text, Compensation;
    SalaryPeriod => "compensation.salary_period", Text, Compensation;
    Benefits => "compensation.benefits", TextList, Compensation;
    HealthcarePlan => "compensation.healthcare_plan", Text, Compensation;
    PensionPlan => "compensation.pension_plan", Text, Compensation;
    VariablePay => "compensation.variable_pay", Flag, Compensation;
    EquityOffered => "compensation.equity_offered", Flag, Compensation;
    InterviewStages => "process.interview_stages", Count, Process;
    ProcessNotes => "process.process_notes", Text, Process;
}

/// Fields that block forward navigation while empty.
pub const CRITICAL_FIELDS: &[FieldPath] = &[
    FieldPath::CompanyName,
    FieldPath::JobTitle,
    FieldPath::PrimaryCity,
    FieldPath::HardSkills,
    FieldPath::Responsibilities,
];

impl FieldPath {
    pub fn is_critical(self) -> bool {
        CRITICAL_FIELDS.contains(&self)
    }

    pub fn default_value(self) -> Value {
        match self {
            FieldPath::SalaryCurrency => Value::String("EUR".to_string()),
            FieldPath::SalaryPeriod => Value::String("year".to_string()),
            other => other.kind().zero_value(),
        }
    }

    /// Lax conversion of an incoming value to this field's declared type.
    ///
    /// `null` means "not provided" and resolves to the default. Numbers are
    /// accepted as text, numeric strings as numbers, and the usual yes/no
    /// spellings as flags. Anything else is a validation error.
    pub fn coerce(self, value: &Value) -> Result<Value, SchemaError> {
        if value.is_null() {
            return Ok(self.default_value());
        }
        let invalid = |message: &str| SchemaError::Validation {
            field: self.as_str().to_string(),
            message: message.to_string(),
        };

        match self.kind() {
            FieldKind::Text => match value {
                Value::String(_) => Ok(value.clone()),
                Value::Number(n) => Ok(Value::String(n.to_string())),
                _ => Err(invalid("expected text")),
            },
            FieldKind::TextList => {
                let items = value
                    .as_array()
                    .ok_or_else(|| invalid("expected a list of text"))?;
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(_) => Ok(item.clone()),
                        Value::Number(n) => Ok(Value::String(n.to_string())),
                        _ => Err(invalid("expected a list of text")),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            FieldKind::Flag => match value {
                Value::Bool(_) => Ok(value.clone()),
                Value::Number(n) => match n.as_f64() {
                    Some(x) if x == 0.0 => Ok(Value::Bool(false)),
                    Some(x) if x == 1.0 => Ok(Value::Bool(true)),
                    _ => Err(invalid("expected true or false")),
                },
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" | "yes" | "y" | "on" | "1" | "t" => Ok(Value::Bool(true)),
                    "false" | "no" | "n" | "off" | "0" | "f" => Ok(Value::Bool(false)),
                    _ => Err(invalid("expected true or false")),
                },
                _ => Err(invalid("expected true or false")),
            },
            FieldKind::Decimal => {
                let number = match value {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                };
                match number {
                    Some(x) if x.is_finite() => Ok(Value::from(x)),
                    _ => Err(invalid("expected a number")),
                }
            }
            FieldKind::Count => {
                let count = match value {
                    Value::Number(n) => n.as_u64().or_else(|| {
                        n.as_f64()
                            .filter(|x| *x >= 0.0 && x.fract() == 0.0)
                            .map(|x| x as u64)
                    }),
                    Value::String(s) => s.trim().parse::<u64>().ok(),
                    _ => None,
                };
                count
                    .and_then(|c| u32::try_from(c).ok())
                    .map(Value::from)
                    .ok_or_else(|| invalid("expected a non-negative whole number"))
            }
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
