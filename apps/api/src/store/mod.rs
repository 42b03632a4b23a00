//! Persistence seam over the document store.
//!
//! Forms and submissions are stored as whole documents. Handlers only see
//! these traits; `postgres` backs production and `memory` backs tests and
//! database-less local runs.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::fields::models::PermanentField;
use crate::forms::models::Form;
use crate::submissions::models::Submission;

#[async_trait]
pub trait FormStore: Send + Sync {
    async fn get_form(&self, id: &str) -> Result<Option<Form>, AppError>;

    /// Writes the whole document, replacing any existing form with the same id.
    async fn put_form(&self, form: &Form) -> Result<(), AppError>;

    /// Atomically sets only `extra_fields` and `updated_at` from `seed`, leaving
    /// every other column of an existing form alone. Inserts `seed` whole when
    /// no form has its id. Returns the stored form.
    async fn replace_extra_fields(&self, seed: &Form) -> Result<Form, AppError>;

    /// Atomically sets `permanent_fields` on a form that has none yet.
    async fn set_permanent_fields(
        &self,
        id: &str,
        fields: &[PermanentField],
        updated_at: DateTime<Utc>,
    ) -> Result<SetOnce, AppError>;
}

/// Outcome of a write that may only happen once.
#[derive(Debug, Clone, PartialEq)]
pub enum SetOnce {
    Applied(Form),
    AlreadySet,
    Missing,
}

/// Which submissions a listing returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionFilter {
    Form(String),
    User(String),
}

impl SubmissionFilter {
    pub fn matches(&self, submission: &Submission) -> bool {
        match self {
            SubmissionFilter::Form(id) => &submission.form_id == id,
            SubmissionFilter::User(id) => &submission.user_id == id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    NewestFirst,
    Unordered,
}

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn insert_submission(&self, submission: &Submission) -> Result<(), AppError>;

    async fn get_submission(&self, id: &str) -> Result<Option<Submission>, AppError>;

    /// Returns false if nothing was deleted.
    async fn delete_submission(&self, id: &str) -> Result<bool, AppError>;

    /// `ListOrder::NewestFirst` may only be requested when `supports_sorted_listing` is true.
    async fn list_submissions(
        &self,
        filter: &SubmissionFilter,
        order: ListOrder,
    ) -> Result<Vec<Submission>, AppError>;

    /// Whether the store can return filtered listings sorted by creation time.
    fn supports_sorted_listing(&self) -> bool;
}
