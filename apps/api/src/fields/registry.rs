//! The permanent candidate schema.
//!
//! One compiled-in table drives both submission validation and the display
//! metadata written onto forms as `permanentFields`.

use super::models::{FieldType, PermanentField};

/// Key of the static field the server always fills from the caller's verified email.
pub const CANDIDATE_EMAIL: &str = "candidateEmail";

/// Value kind the validator enforces for a static field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticKind {
    String,
    Number,
}

#[derive(Debug, Clone, Copy)]
pub struct StaticFieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: StaticKind,
    pub required: bool,
    /// Multi-line string input when rendered.
    pub multiline: bool,
}

impl StaticFieldSpec {
    const fn new(key: &'static str, label: &'static str, kind: StaticKind, required: bool) -> Self {
        Self {
            key,
            label,
            kind,
            required,
            multiline: false,
        }
    }

    const fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    pub fn display_type(&self) -> FieldType {
        match (self.kind, self.multiline) {
            (StaticKind::Number, _) => FieldType::Number,
            (StaticKind::String, true) => FieldType::Textarea,
            (StaticKind::String, false) => FieldType::Text,
        }
    }
}

pub const STATIC_FIELDS: &[StaticFieldSpec] = &[
    StaticFieldSpec::new("candidateName", "Full Name", StaticKind::String, true),
    StaticFieldSpec::new(CANDIDATE_EMAIL, "Email Address", StaticKind::String, true),
    StaticFieldSpec::new("candidatePhone", "Phone Number", StaticKind::String, true),
    StaticFieldSpec::new("primarySkillSet", "Primary Skills", StaticKind::String, true),
    StaticFieldSpec::new("secondarySkillSet", "Secondary Skills", StaticKind::String, false),
    StaticFieldSpec::new("candidateLocation", "Current Location", StaticKind::String, true),
    StaticFieldSpec::new(
        "preferredJobLocation",
        "Preferred Job Location",
        StaticKind::String,
        true,
    ),
    StaticFieldSpec::new(
        "secondaryPreferredJobLocation",
        "Secondary Preferred Location",
        StaticKind::String,
        false,
    ),
    StaticFieldSpec::new("experience", "Years of Experience", StaticKind::Number, true),
    StaticFieldSpec::new(
        "coreExperience",
        "Core Experience Details",
        StaticKind::String,
        false,
    )
    .multiline(),
    StaticFieldSpec::new(
        "expectation",
        "Salary Expectation (Annual)",
        StaticKind::Number,
        false,
    ),
];

/// Locked display metadata for every static field, in registry order.
pub fn permanent_fields() -> Vec<PermanentField> {
    STATIC_FIELDS
        .iter()
        .enumerate()
        .map(|(idx, spec)| PermanentField {
            key: spec.key.to_string(),
            label: spec.label.to_string(),
            field_type: spec.display_type(),
            required: spec.required,
            locked: true,
            order: idx as u32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<_> = STATIC_FIELDS.iter().map(|s| s.key).collect();
        assert_eq!(keys.len(), STATIC_FIELDS.len());
    }

    #[test]
    fn test_required_set() {
        let required: Vec<_> = STATIC_FIELDS
            .iter()
            .filter(|s| s.required)
            .map(|s| s.key)
            .collect();
        assert_eq!(
            required,
            vec![
                "candidateName",
                "candidateEmail",
                "candidatePhone",
                "primarySkillSet",
                "candidateLocation",
                "preferredJobLocation",
                "experience",
            ]
        );
    }

    #[test]
    fn test_permanent_fields_follow_registry() {
        let fields = permanent_fields();
        assert_eq!(fields.len(), STATIC_FIELDS.len());
        assert!(fields.iter().all(|f| f.locked));
        assert_eq!(fields[8].key, "experience");
        assert_eq!(fields[8].field_type, FieldType::Number);
        assert_eq!(fields[8].order, 8);
        assert_eq!(fields[9].field_type, FieldType::Textarea);
    }
}
