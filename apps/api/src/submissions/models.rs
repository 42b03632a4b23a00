use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::fields::models::FieldValues;

/// A validated application. Immutable once stored; only deletion is allowed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub form_id: String,
    pub user_id: String,
    pub user_email: String,
    pub static_values: FieldValues,
    pub extra_values: FieldValues,
    pub created_at: DateTime<Utc>,
}

/// Raw submission body. Shapes are checked by the service so the errors read
/// like every other validation failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    #[serde(default)]
    pub static_values: Option<Value>,
    #[serde(default)]
    pub extra_values: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSubmissionsResponse {
    pub form_id: String,
    pub total: usize,
    pub submissions: Vec<Submission>,
}

#[derive(Debug, Serialize)]
pub struct MySubmissionsResponse {
    pub total: usize,
    pub submissions: Vec<Submission>,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: &'static str,
    pub id: String,
}
