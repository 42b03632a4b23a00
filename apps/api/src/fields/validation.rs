//! Validation & sanitization of submitted values.
//!
//! Static values and extra values are checked in two independent passes, each
//! against its own schema. Both passes walk the schema (not the payload), so
//! errors come out in declaration order and keys the schema does not know are
//! dropped without comment.

use serde_json::{Map, Number, Value};

use super::models::{ExtraField, FieldValue, FieldValues};
use super::registry::{StaticFieldSpec, StaticKind};

/// Outcome of one validation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validated {
    pub sanitized: FieldValues,
    pub errors: Vec<String>,
}

impl Validated {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum Expect {
    Number,
    Text,
}

struct Rule<'a> {
    /// Lookup key in the payload and in the sanitized output.
    key: &'a str,
    /// How the field is named in error messages.
    name: &'a str,
    expect: Expect,
    required: bool,
}

/// Validates `values` against the static registry. Errors name fields by key.
pub fn validate_static(values: &Map<String, Value>, registry: &[StaticFieldSpec]) -> Validated {
    run(
        values,
        registry.iter().map(|spec| Rule {
            key: spec.key,
            name: spec.key,
            expect: match spec.kind {
                StaticKind::Number => Expect::Number,
                StaticKind::String => Expect::Text,
            },
            required: spec.required,
        }),
    )
}

/// Validates `values` against the active subset of `fields`. Errors name fields by label.
///
/// Inactive fields are skipped entirely, so a value submitted for one is
/// neither checked nor kept.
pub fn validate_extra(values: &Map<String, Value>, fields: &[ExtraField]) -> Validated {
    run(
        values,
        active_fields(fields).map(|field| Rule {
            key: &field.id,
            name: &field.label,
            expect: if field.field_type.is_numeric() {
                Expect::Number
            } else {
                Expect::Text
            },
            required: field.required,
        }),
    )
}

pub fn active_fields(fields: &[ExtraField]) -> impl Iterator<Item = &ExtraField> {
    fields.iter().filter(|f| f.active)
}

fn run<'a>(values: &Map<String, Value>, rules: impl IntoIterator<Item = Rule<'a>>) -> Validated {
    let mut out = Validated::default();

    for rule in rules {
        let value = match values.get(rule.key) {
            Some(v) if !is_blank(v) => v,
            _ => {
                if rule.required {
                    out.errors.push(format!("{} is required", rule.name));
                }
                continue;
            }
        };

        match rule.expect {
            Expect::Number => match coerce_number(value) {
                Some(n) => {
                    out.sanitized
                        .insert(rule.key.to_string(), FieldValue::Number(n));
                }
                None => out
                    .errors
                    .push(format!("{} must be a valid number", rule.name)),
            },
            Expect::Text => match value {
                Value::String(s) => {
                    out.sanitized
                        .insert(rule.key.to_string(), FieldValue::Text(s.trim().to_string()));
                }
                _ => out.errors.push(format!("{} must be a string", rule.name)),
            },
        }
    }

    out
}

/// Null and the empty string count as "not supplied".
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// JSON numbers pass through unchanged; strings are parsed after trimming, as an
/// integer when they are one. Non-finite results are rejected.
fn coerce_number(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            match s.parse::<i64>() {
                Ok(i) => Some(Number::from(i)),
                Err(_) => Number::from_f64(s.parse::<f64>().ok()?),
            }
        }
        _ => None,
    }
}
