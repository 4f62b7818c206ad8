//! JSON Schema for `VacancyDescription`, used as the tool-call parameter
//! contract during structured extraction.

use serde_json::{json, Map, Value};

use crate::schema::fields::{FieldKind, FieldPath};

fn leaf_schema(kind: FieldKind) -> Value {
    match kind {
        FieldKind::Text => json!({"type": "string"}),
        FieldKind::TextList => json!({"type": "array", "items": {"type": "string"}}),
        FieldKind::Flag => json!({"type": "boolean"}),
        FieldKind::Decimal => json!({"type": "number"}),
        FieldKind::Count => json!({"type": "integer", "minimum": 0}),
    }
}

fn object_schema(properties: Map<String, Value>) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "additionalProperties": false,
    })
}

/// Object schema with one nested object per section; extra keys are disallowed
/// at every level.
pub fn canonical_json_schema() -> Value {
    let mut sections: Vec<(&'static str, Map<String, Value>)> = Vec::new();

    for field in FieldPath::ALL {
        let Some((section, leaf)) = field.as_str().split_once('.') else {
            continue;
        };
        let position = match sections.iter().position(|(name, _)| *name == section) {
            Some(idx) => idx,
            None => {
                sections.push((section, Map::new()));
                sections.len() - 1
            }
        };
        sections[position]
            .1
            .insert(leaf.to_string(), leaf_schema(field.kind()));
    }

    let properties: Map<String, Value> = sections
        .into_iter()
        .map(|(name, props)| (name.to_string(), object_schema(props)))
        .collect();

    let mut schema = object_schema(properties);
    if let Some(obj) = schema.as_object_mut() {
        obj.insert("title".to_string(), json!("VacancyDescription"));
    }
    schema
}
