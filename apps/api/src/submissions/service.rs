use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use super::models::{CreateSubmissionRequest, Submission};
use crate::auth::Caller;
use crate::errors::AppError;
use crate::fields::registry::{self, CANDIDATE_EMAIL};
use crate::fields::validation::{validate_extra, validate_static};
use crate::store::{FormStore, ListOrder, SubmissionFilter, SubmissionStore};

/// Validates and stores a submission from `caller` against `form_id`.
///
/// `candidateEmail` is always overwritten with the caller's verified email.
/// Static values are checked first; extra values only once static ones pass.
pub async fn create_submission(
    forms: &dyn FormStore,
    submissions: &dyn SubmissionStore,
    caller: &Caller,
    form_id: &str,
    req: CreateSubmissionRequest,
) -> Result<Submission, AppError> {
    let mut static_values = match req.static_values {
        Some(Value::Object(map)) => map,
        _ => {
            return Err(AppError::validation(
                "staticValues is required and must be an object",
            ))
        }
    };
    let extra_values = match req.extra_values {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map,
        Some(_) => return Err(AppError::validation("extraValues must be an object")),
    };

    let form = forms
        .get_form(form_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Form with ID '{form_id}' does not exist")))?;

    static_values.insert(
        CANDIDATE_EMAIL.to_string(),
        Value::String(caller.email.clone()),
    );

    let checked_static = validate_static(&static_values, registry::STATIC_FIELDS);
    if !checked_static.is_valid() {
        return Err(AppError::invalid_fields(
            "Static values validation failed",
            checked_static.errors,
        ));
    }

    let checked_extra = validate_extra(&extra_values, &form.extra_fields);
    if !checked_extra.is_valid() {
        return Err(AppError::invalid_fields(
            "Extra values validation failed",
            checked_extra.errors,
        ));
    }

    let submission = Submission {
        id: Uuid::new_v4().to_string(),
        form_id: form_id.to_string(),
        user_id: caller.uid.clone(),
        user_email: caller.email.clone(),
        static_values: checked_static.sanitized,
        extra_values: checked_extra.sanitized,
        created_at: Utc::now(),
    };
    submissions.insert_submission(&submission).await?;

    info!(
        "Submission '{}' created for form '{}' by {}",
        submission.id, form_id, caller.email
    );
    Ok(submission)
}

/// Lists submissions newest first, sorting in memory when the store cannot.
pub async fn list_newest_first(
    store: &dyn SubmissionStore,
    filter: &SubmissionFilter,
) -> Result<Vec<Submission>, AppError> {
    if store.supports_sorted_listing() {
        return store.list_submissions(filter, ListOrder::NewestFirst).await;
    }

    warn!("Store cannot sort submissions for {filter:?}; sorting in memory");
    let mut found = store.list_submissions(filter, ListOrder::Unordered).await?;
    found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(found)
}

/// All submissions for an existing form.
pub async fn list_for_form(
    forms: &dyn FormStore,
    submissions: &dyn SubmissionStore,
    form_id: &str,
) -> Result<Vec<Submission>, AppError> {
    if forms.get_form(form_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Form with ID '{form_id}' does not exist"
        )));
    }
    list_newest_first(submissions, &SubmissionFilter::Form(form_id.to_string())).await
}

pub async fn get_submission(
    store: &dyn SubmissionStore,
    submission_id: &str,
) -> Result<Submission, AppError> {
    store.get_submission(submission_id).await?.ok_or_else(|| {
        AppError::NotFound(format!(
            "Submission with ID '{submission_id}' does not exist"
        ))
    })
}

/// Deletes a submission if `caller` owns it or is an admin.
pub async fn delete_submission(
    store: &dyn SubmissionStore,
    caller: &Caller,
    submission_id: &str,
) -> Result<(), AppError> {
    let submission = store
        .get_submission(submission_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;

    if !caller.can_mutate_submission(&submission.user_id) {
        warn!(
            "{} attempted to delete submission '{}' owned by another user",
            caller.email, submission_id
        );
        return Err(AppError::Forbidden(
            "You are not authorized to delete this submission".to_string(),
        ));
    }

    if !store.delete_submission(submission_id).await? {
        return Err(AppError::NotFound("Submission not found".to_string()));
    }

    info!("Submission '{submission_id}' deleted by {}", caller.email);
    Ok(())
}
