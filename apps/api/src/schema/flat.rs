//! Flat (dotted-key) representation of the vacancy record, plus the helpers
//! that move data between it and the nested form.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::schema::fields::{FieldKind, FieldPath};
use crate::schema::{SchemaError, VacancyDescription};

/// Dotted path → leaf value.
pub type FlatRecord = BTreeMap<String, Value>;

/// Legacy / short keys → canonical dotted paths.
pub const ALIASES: &[(&str, &str)] = &[
    ("company_name", "company.name"),
    ("company_website", "company.website"),
    ("city", "location.primary_city"),
    ("country", "location.country"),
    ("job_title", "position.job_title"),
    ("role_summary", "position.role_summary"),
    ("tasks", "responsibilities.items"),
    ("contract_type", "employment.job_type"),
    ("remote_policy", "employment.remote_policy"),
    ("travel_required", "employment.travel_required"),
];

/// Reads a nested mapping by dotted path. `None` if any segment is absent.
pub fn dot_get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(root, |cur, part| cur.as_object()?.get(part))
}

/// Writes a nested mapping by dotted path, creating intermediate levels.
/// Non-mapping values found on the way are replaced.
pub fn dot_set(root: &mut Value, path: &str, value: Value) {
    let mut parts: Vec<&str> = path.split('.').collect();
    let last = parts.pop().unwrap_or_default();

    let mut cur = root;
    for part in parts {
        cur = ensure_object(cur)
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    ensure_object(cur).insert(last.to_string(), value);
}

fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}

/// Flattens a record into dotted keys. Never fails.
pub fn flatten(record: &VacancyDescription) -> FlatRecord {
    serde_json::to_value(record)
        .map(|v| flatten_value(&v))
        .unwrap_or_default()
}

/// Flattens any JSON mapping; non-mapping values are leaves.
pub fn flatten_value(value: &Value) -> FlatRecord {
    fn walk(prefix: &str, value: &Value, out: &mut FlatRecord) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    let path = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{prefix}.{key}")
                    };
                    walk(&path, child, out);
                }
            }
            leaf => {
                out.insert(prefix.to_string(), leaf.clone());
            }
        }
    }

    let mut out = FlatRecord::new();
    if value.is_object() {
        walk("", value, &mut out);
    }
    out
}

/// Fully defaulted flat record.
pub fn defaults() -> FlatRecord {
    flatten(&VacancyDescription::default())
}

/// Expands dotted keys and validates against the canonical shape.
///
/// Keys that are not schema fields are ignored; missing fields take their
/// defaults. A value of the wrong type fails with `SchemaError::Validation`.
pub fn unflatten(flat: &FlatRecord) -> Result<VacancyDescription, SchemaError> {
    let mut nested = Value::Object(Map::new());
    for (key, value) in flat {
        let Ok(field) = key.parse::<FieldPath>() else {
            continue;
        };
        dot_set(&mut nested, field.as_str(), field.coerce(value)?);
    }
    serde_json::from_value(nested).map_err(|e| SchemaError::Validation {
        field: "record".to_string(),
        message: e.to_string(),
    })
}

/// Copies legacy keys to their canonical path unless the canonical key is
/// already present. The legacy keys themselves are kept.
pub fn apply_aliases(flat: &FlatRecord) -> FlatRecord {
    let mut out = flat.clone();
    for (legacy, canonical) in ALIASES {
        if let Some(value) = flat.get(*legacy) {
            if !out.contains_key(*canonical) {
                out.insert(canonical.to_string(), value.clone());
            }
        }
    }
    out
}

/// Splits a multi-line string into trimmed, non-blank lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Turns raw (partial, possibly legacy-keyed, flat or nested) data into a
/// fully defaulted canonical record.
pub fn coerce_and_fill(raw: &Value) -> Result<VacancyDescription, SchemaError> {
    let incoming = match raw {
        Value::Null => FlatRecord::new(),
        Value::Object(_) => flatten_value(raw),
        _ => {
            return Err(SchemaError::Validation {
                field: "record".to_string(),
                message: "expected a JSON object".to_string(),
            })
        }
    };
    let incoming = apply_aliases(&incoming);

    let mut flat = defaults();
    for (key, value) in incoming {
        if let Some(slot) = flat.get_mut(&key) {
            *slot = value;
        }
    }

    for field in FieldPath::ALL {
        if field.kind() != FieldKind::TextList {
            continue;
        }
        let items = match flat.get(field.as_str()) {
            Some(Value::String(text)) => split_lines(text),
            _ => continue,
        };
        flat.insert(
            field.as_str().to_string(),
            Value::Array(items.into_iter().map(Value::String).collect()),
        );
    }

    unflatten(&flat)
}
