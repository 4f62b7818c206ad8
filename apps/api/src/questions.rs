use serde::Serialize;
use serde_json::Value;

use crate::language::Language;
use crate::schema::{FieldPath, FlatRecord, CRITICAL_FIELDS};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FollowupQuestion {
    pub field: FieldPath,
    pub question: String,
}

/// Absent, null, "", [], `false` and `0` all count as empty.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(map)) => map.is_empty(),
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
    }
}

/// Keys from `keys`, in order, that are critical and empty in `state`.
pub fn missing_fields(state: &FlatRecord, keys: &[FieldPath]) -> Vec<FieldPath> {
    keys.iter()
        .copied()
        .filter(|field| field.is_critical() && is_empty_value(state.get(field.as_str())))
        .collect()
}

pub fn list_missing_critical(state: &FlatRecord) -> Vec<FieldPath> {
    missing_fields(state, CRITICAL_FIELDS)
}

/// One static prompt per missing critical field.
pub fn followup_questions(
    state: &FlatRecord,
    keys: &[FieldPath],
    lang: Language,
) -> Vec<FollowupQuestion> {
    missing_fields(state, keys)
        .into_iter()
        .map(|field| FollowupQuestion {
            field,
            question: match lang {
                Language::En => format!("Please provide a value for **{field}**."),
                Language::De => format!("Bitte Wert für **{field}** angeben."),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state() -> FlatRecord {
        let mut state = crate::schema::flat::defaults();
        state.insert("company.name".into(), json!(""));
        state.insert("position.job_title".into(), json!("Engineer"));
        state.insert("requirements.hard_skills".into(), json!([]));
        state.insert("responsibilities.items".into(), json!(["x"]));
        state.insert("location.primary_city".into(), json!("Berlin"));
        state
    }

    #[test]
    fn test_critical_gap_set() {
        let missing = missing_fields(&state(), FieldPath::ALL);
        assert_eq!(
            missing,
            vec![FieldPath::CompanyName, FieldPath::HardSkills]
        );
        assert_eq!(list_missing_critical(&state()), missing);
    }

    #[test]
    fn test_non_critical_empties_are_ignored() {
        let missing = missing_fields(&state(), &[FieldPath::CompanyIndustry, FieldPath::Benefits]);
        assert!(missing.is_empty());
    }

    #[test]
    fn test_absent_keys_are_empty() {
        let missing = list_missing_critical(&FlatRecord::new());
        assert_eq!(missing.len(), CRITICAL_FIELDS.len());
    }

    #[test]
    fn test_empty_value_rules() {
        assert!(is_empty_value(Some(&json!("   "))));
        assert!(is_empty_value(Some(&json!(false))));
        assert!(is_empty_value(Some(&json!(0))));
        assert!(is_empty_value(Some(&json!(0.0))));
        assert!(!is_empty_value(Some(&json!(3))));
        assert!(!is_empty_value(Some(&json!(["a"]))));
    }

    #[test]
    fn test_followup_questions_localised() {
        let keys = [FieldPath::CompanyName, FieldPath::JobTitle];
        let en = followup_questions(&state(), &keys, Language::En);
        assert_eq!(en.len(), 1);
        assert_eq!(en[0].field, FieldPath::CompanyName);
        assert_eq!(en[0].question, "Please provide a value for **company.name**.");

        let de = followup_questions(&state(), &keys, Language::De);
        assert_eq!(de[0].question, "Bitte Wert für **company.name** angeben.");
    }
}
