use serde::Serialize;

use crate::generation::boolean_query::build_boolean_query;
use crate::schema::{FieldPath, VacancyDescription};

const PLACEHOLDER: &str = "—";

/// Published salary range of a vacancy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryBand {
    pub min: f64,
    pub max: f64,
    pub currency: String,
    pub period: String,
    /// "52000-65000 EUR/year"
    pub label: String,
    /// False when max is below min.
    pub valid: bool,
}

impl SalaryBand {
    /// `None` unless the vacancy says a salary is provided.
    pub fn from_record(record: &VacancyDescription) -> Option<Self> {
        let comp = &record.compensation;
        if !comp.salary_provided {
            return None;
        }
        Some(Self {
            min: comp.salary_min,
            max: comp.salary_max,
            currency: comp.salary_currency.clone(),
            period: comp.salary_period.clone(),
            label: format!(
                "{:.0}-{:.0} {}/{}",
                comp.salary_min, comp.salary_max, comp.salary_currency, comp.salary_period
            ),
            valid: comp.salary_max >= comp.salary_min,
        })
    }
}

/// The at-a-glance lines shown above the outputs. Empty values read "—".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub company: String,
    pub role: String,
    pub location: String,
    pub work_policy: String,
    pub salary: String,
    pub benefits: String,
}

fn or_placeholder(value: String) -> String {
    if value.trim().is_empty() {
        PLACEHOLDER.to_string()
    } else {
        value
    }
}

impl Overview {
    pub fn new(record: &VacancyDescription, salary: Option<&SalaryBand>) -> Self {
        let location = if record.location.country.is_empty() {
            record.location.primary_city.clone()
        } else if record.location.primary_city.is_empty() {
            record.location.country.clone()
        } else {
            format!(
                "{}, {}",
                record.location.primary_city, record.location.country
            )
        };
        let benefits: Vec<&str> = record
            .compensation
            .benefits
            .iter()
            .take(10)
            .map(String::as_str)
            .collect();

        Self {
            company: or_placeholder(record.company.name.clone()),
            role: or_placeholder(record.position.job_title.clone()),
            location: or_placeholder(location),
            work_policy: or_placeholder(record.employment.work_policy.clone()),
            salary: or_placeholder(salary.map(|s| s.label.clone()).unwrap_or_default()),
            benefits: or_placeholder(benefits.join(", ")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub overview: Overview,
    pub record: VacancyDescription,
    pub salary: Option<SalaryBand>,
    pub boolean_query: String,
    pub missing_critical: Vec<FieldPath>,
    pub job_ad: Option<String>,
    pub interview_guide: Option<String>,
}

impl SessionSummary {
    pub fn new(
        record: VacancyDescription,
        missing_critical: Vec<FieldPath>,
        job_ad: Option<String>,
        interview_guide: Option<String>,
    ) -> Self {
        let salary = SalaryBand::from_record(&record);
        Self {
            overview: Overview::new(&record, salary.as_ref()),
            boolean_query: build_boolean_query(&record),
            salary,
            record,
            missing_critical,
            job_ad,
            interview_guide,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salaried() -> VacancyDescription {
        let mut jd = VacancyDescription::default();
        jd.compensation.salary_provided = true;
        jd.compensation.salary_min = 52000.4;
        jd.compensation.salary_max = 64999.6;
        jd
    }

    #[test]
    fn test_salary_band_label_is_rounded() {
        let band = SalaryBand::from_record(&salaried()).unwrap();
        assert_eq!(band.label, "52000-65000 EUR/year");
        assert!(band.valid);
    }

    #[test]
    fn test_inverted_band_is_flagged() {
        let mut jd = salaried();
        jd.compensation.salary_max = 1000.0;
        assert!(!SalaryBand::from_record(&jd).unwrap().valid);
    }

    #[test]
    fn test_no_band_without_salary_flag() {
        let mut jd = salaried();
        jd.compensation.salary_provided = false;
        assert_eq!(SalaryBand::from_record(&jd), None);
    }

    #[test]
    fn test_overview_placeholders() {
        let overview = Overview::new(&VacancyDescription::default(), None);
        assert_eq!(overview.company, "—");
        assert_eq!(overview.location, "—");
        assert_eq!(overview.salary, "—");
        assert_eq!(overview.benefits, "—");
    }

    #[test]
    fn test_summary_includes_query_and_location() {
        let mut jd = salaried();
        jd.position.job_title = "Data Scientist".to_string();
        jd.location.primary_city = "Berlin".to_string();
        jd.location.country = "Germany".to_string();

        let summary = SessionSummary::new(jd, vec![FieldPath::CompanyName], None, None);
        assert_eq!(summary.boolean_query, r#""Data Scientist" AND Berlin"#);
        assert_eq!(summary.overview.location, "Berlin, Germany");
        assert_eq!(summary.overview.salary, "52000-65000 EUR/year");
        assert_eq!(summary.missing_critical, vec![FieldPath::CompanyName]);
    }
}
