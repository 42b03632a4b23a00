//! Admin replacement of a form's extra-field list.
//!
//! The submitted list is checked as a whole. Any problem rejects the entire
//! request; nothing is applied partially.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use super::models::{ExtraField, FieldType};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceExtraFieldsRequest {
    pub extra_fields: Vec<ExtraFieldInput>,
}

/// An extra field as submitted, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtraFieldInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub order: Option<Value>,
}

/// Normalizes the submitted list or returns every problem found, in list order.
///
/// Labels are trimmed; `required` defaults to false, `active` to true and `order` to 0.
pub fn normalize_extra_fields(inputs: Vec<ExtraFieldInput>) -> Result<Vec<ExtraField>, Vec<String>> {
    let mut errors = Vec::new();
    let mut fields = Vec::with_capacity(inputs.len());

    for (idx, input) in inputs.into_iter().enumerate() {
        let at = |msg: &str| format!("extraFields[{idx}]: {msg}");
        let before = errors.len();

        let id = input.id.unwrap_or_default();
        if id.is_empty() {
            errors.push(at("Field ID is required"));
        }

        let label = input.label.unwrap_or_default().trim().to_string();
        if label.is_empty() {
            errors.push(at("Field label is required"));
        }

        let field_type = input.field_type.as_deref().and_then(FieldType::parse);
        if field_type.is_none() {
            errors.push(at("Type must be text, number, or textarea"));
        }

        let order = match input.order {
            None | Some(Value::Null) => Some(0),
            Some(raw) => match parse_order(&raw) {
                Ok(order) => Some(order),
                Err(msg) => {
                    errors.push(at(msg));
                    None
                }
            },
        };

        if errors.len() > before {
            continue;
        }
        if let (Some(field_type), Some(order)) = (field_type, order) {
            fields.push(ExtraField {
                id,
                label,
                field_type,
                required: input.required.unwrap_or(false),
                active: input.active.unwrap_or(true),
                order,
            });
        }
    }

    let mut seen = HashSet::new();
    if fields.iter().any(|f| !seen.insert(f.id.as_str())) {
        errors.push("Extra field IDs must be unique".to_string());
    }

    if errors.is_empty() {
        Ok(fields)
    } else {
        Err(errors)
    }
}

fn parse_order(raw: &Value) -> Result<u32, &'static str> {
    let Value::Number(n) = raw else {
        return Err("Order must be an integer");
    };
    if let Some(i) = n.as_i64() {
        return if i < 0 {
            Err("Order must be a non-negative integer")
        } else {
            u32::try_from(i).map_err(|_| "Order is out of range")
        };
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f < 0.0 => Err("Order must be a non-negative integer"),
        Some(f) if f.fract() == 0.0 && f <= u32::MAX as f64 => Ok(f as u32),
        _ => Err("Order must be an integer"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inputs(v: Value) -> Vec<ExtraFieldInput> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_defaults_applied_and_label_trimmed() {
        let fields = normalize_extra_fields(inputs(json!([
            {"id": "f1", "label": "  Portfolio ", "type": "text"}
        ])))
        .unwrap();
        assert_eq!(
            fields,
            vec![ExtraField {
                id: "f1".into(),
                label: "Portfolio".into(),
                field_type: FieldType::Text,
                required: false,
                active: true,
                order: 0,
            }]
        );
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let errors = normalize_extra_fields(inputs(json!([
            {"id": "f1", "label": "A", "type": "text"},
            {"id": "f1", "label": "B", "type": "number"}
        ])))
        .unwrap_err();
        assert_eq!(errors, vec!["Extra field IDs must be unique"]);
    }

    #[test]
    fn test_all_problems_itemized() {
        let errors = normalize_extra_fields(inputs(json!([
            {"id": "", "label": "  ", "type": "email", "order": -1},
            {"id": "f2", "label": "ok", "type": "number", "order": 1.5}
        ])))
        .unwrap_err();
        assert_eq!(
            errors,
            vec![
                "extraFields[0]: Field ID is required",
                "extraFields[0]: Field label is required",
                "extraFields[0]: Type must be text, number, or textarea",
                "extraFields[0]: Order must be a non-negative integer",
                "extraFields[1]: Order must be an integer",
            ]
        );
    }

    #[test]
    fn test_explicit_flags_and_order_kept() {
        let fields = normalize_extra_fields(inputs(json!([
            {"id": "f1", "label": "Notice", "type": "number", "required": true, "active": false, "order": 3}
        ])))
        .unwrap();
        assert!(fields[0].required);
        assert!(!fields[0].active);
        assert_eq!(fields[0].order, 3);
    }

    #[test]
    fn test_empty_list_allowed() {
        assert_eq!(normalize_extra_fields(Vec::new()).unwrap(), Vec::new());
    }
}
