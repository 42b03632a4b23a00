use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::models::{ExtraField, PermanentField};

pub const DEFAULT_FORM_TITLE: &str = "Candidate Application Form";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: String,
    pub title: String,
    pub permanent_fields: Vec<PermanentField>,
    pub extra_fields: Vec<ExtraField>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Form {
    pub fn new(id: String, title: String, created_by: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            permanent_fields: Vec::new(),
            extra_fields: Vec::new(),
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

/// What a candidate needs to render a form.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FormTemplate {
    pub id: String,
    pub title: String,
    pub permanent_fields: Vec<PermanentField>,
    pub extra_fields: Vec<ExtraField>,
}

impl FormTemplate {
    /// Stand-in returned for a form id that has never been stored.
    pub fn placeholder(id: String) -> Self {
        Self {
            id,
            title: DEFAULT_FORM_TITLE.to_string(),
            permanent_fields: Vec::new(),
            extra_fields: Vec::new(),
        }
    }
}

impl From<Form> for FormTemplate {
    fn from(form: Form) -> Self {
        Self {
            id: form.id,
            title: form.title,
            permanent_fields: form.permanent_fields,
            extra_fields: form.extra_fields,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateFormRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}
