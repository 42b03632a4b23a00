use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// Input widget / value type of a form field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Textarea,
}

impl FieldType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "text" => Some(FieldType::Text),
            "number" => Some(FieldType::Number),
            "textarea" => Some(FieldType::Textarea),
            _ => None,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, FieldType::Number)
    }
}

/// Admin-defined custom field stored on a form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtraField {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Documents written before the flag existed count as active.
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub order: u32,
}

fn default_active() -> bool {
    true
}

/// Display metadata for a permanent field. Locked: never editable by admins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PermanentField {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub required: bool,
    pub locked: bool,
    pub order: u32,
}

/// A sanitized value ready for persistence. Integral numbers stay integral.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Number(Number),
    Text(String),
}

/// Sanitized values keyed by static field key or extra field id.
pub type FieldValues = BTreeMap<String, FieldValue>;
