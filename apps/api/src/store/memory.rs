use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{FormStore, ListOrder, SetOnce, SubmissionFilter, SubmissionStore};
use crate::errors::AppError;
use crate::fields::models::PermanentField;
use crate::forms::models::Form;
use crate::submissions::models::Submission;

/// Process-local store. Contents are lost on restart.
pub struct MemoryStore {
    forms: RwLock<HashMap<String, Form>>,
    submissions: RwLock<HashMap<String, Submission>>,
    sorted_listing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_sorted_listing(true)
    }

    /// A store that declines sorted listings, forcing callers onto their in-memory sort.
    pub fn with_sorted_listing(sorted_listing: bool) -> Self {
        Self {
            forms: RwLock::new(HashMap::new()),
            submissions: RwLock::new(HashMap::new()),
            sorted_listing,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FormStore for MemoryStore {
    async fn get_form(&self, id: &str) -> Result<Option<Form>, AppError> {
        Ok(self.forms.read().await.get(id).cloned())
    }

    async fn put_form(&self, form: &Form) -> Result<(), AppError> {
        self.forms
            .write()
            .await
            .insert(form.id.clone(), form.clone());
        Ok(())
    }

    async fn replace_extra_fields(&self, seed: &Form) -> Result<Form, AppError> {
        let mut forms = self.forms.write().await;
        let stored = forms
            .entry(seed.id.clone())
            .and_modify(|form| {
                form.extra_fields = seed.extra_fields.clone();
                form.updated_at = seed.updated_at;
            })
            .or_insert_with(|| seed.clone());
        Ok(stored.clone())
    }

    async fn set_permanent_fields(
        &self,
        id: &str,
        fields: &[PermanentField],
        updated_at: DateTime<Utc>,
    ) -> Result<SetOnce, AppError> {
        let mut forms = self.forms.write().await;
        let Some(form) = forms.get_mut(id) else {
            return Ok(SetOnce::Missing);
        };
        if !form.permanent_fields.is_empty() {
            return Ok(SetOnce::AlreadySet);
        }
        form.permanent_fields = fields.to_vec();
        form.updated_at = updated_at;
        Ok(SetOnce::Applied(form.clone()))
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn insert_submission(&self, submission: &Submission) -> Result<(), AppError> {
        self.submissions
            .write()
            .await
            .insert(submission.id.clone(), submission.clone());
        Ok(())
    }

    async fn get_submission(&self, id: &str) -> Result<Option<Submission>, AppError> {
        Ok(self.submissions.read().await.get(id).cloned())
    }

    async fn delete_submission(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.submissions.write().await.remove(id).is_some())
    }

    async fn list_submissions(
        &self,
        filter: &SubmissionFilter,
        order: ListOrder,
    ) -> Result<Vec<Submission>, AppError> {
        if order == ListOrder::NewestFirst && !self.sorted_listing {
            return Err(AppError::Internal(anyhow::anyhow!(
                "sorted listing is not supported by this store"
            )));
        }
        let mut found: Vec<Submission> = self
            .submissions
            .read()
            .await
            .values()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        if order == ListOrder::NewestFirst {
            found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }
        Ok(found)
    }

    fn supports_sorted_listing(&self) -> bool {
        self.sorted_listing
    }
}
