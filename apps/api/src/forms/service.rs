use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::models::{CreateFormRequest, Form, FormTemplate, DEFAULT_FORM_TITLE};
use crate::auth::Caller;
use crate::errors::AppError;
use crate::fields::registry;
use crate::fields::replace::{normalize_extra_fields, ReplaceExtraFieldsRequest};
use crate::store::{FormStore, SetOnce};

/// Returns the stored form, or the placeholder template when the id is unknown. Never writes.
pub async fn get_template(store: &dyn FormStore, form_id: &str) -> Result<FormTemplate, AppError> {
    Ok(store
        .get_form(form_id)
        .await?
        .map(FormTemplate::from)
        .unwrap_or_else(|| FormTemplate::placeholder(form_id.to_string())))
}

/// Creates (or overwrites) a form. A blank or missing id gets a generated one.
pub async fn create_form(
    store: &dyn FormStore,
    caller: &Caller,
    req: CreateFormRequest,
) -> Result<Form, AppError> {
    let title = match req.title {
        None => DEFAULT_FORM_TITLE.to_string(),
        Some(t) if t.trim().is_empty() => {
            return Err(AppError::invalid_fields(
                "Invalid request data",
                vec!["title: Title is required".to_string()],
            ))
        }
        Some(t) => t.trim().to_string(),
    };
    let id = req
        .id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let form = Form::new(id, title, caller.uid.clone());
    store.put_form(&form).await?;

    info!("Form '{}' created by {}", form.id, caller.email);
    Ok(form)
}

/// Swaps the form's whole extra-field list. A missing form is created with the default title.
pub async fn replace_extra_fields(
    store: &dyn FormStore,
    caller: &Caller,
    form_id: &str,
    req: ReplaceExtraFieldsRequest,
) -> Result<Form, AppError> {
    let extra_fields = normalize_extra_fields(req.extra_fields)
        .map_err(|details| AppError::invalid_fields("Invalid extra fields data", details))?;

    // Only used whole when the form does not exist yet.
    let mut seed = Form::new(
        form_id.to_string(),
        DEFAULT_FORM_TITLE.to_string(),
        caller.uid.clone(),
    );
    seed.extra_fields = extra_fields;
    let form = store.replace_extra_fields(&seed).await?;

    info!(
        "Form '{}' extra fields replaced ({} fields) by {}",
        form.id,
        form.extra_fields.len(),
        caller.email
    );
    Ok(form)
}

/// Writes the registry's display metadata onto an existing form. Permanent fields are set once.
pub async fn backfill_permanent_fields(
    store: &dyn FormStore,
    form_id: &str,
) -> Result<Form, AppError> {
    match store
        .set_permanent_fields(form_id, &registry::permanent_fields(), Utc::now())
        .await?
    {
        SetOnce::Applied(form) => {
            info!("Permanent fields added to form '{form_id}'");
            Ok(form)
        }
        SetOnce::AlreadySet => Err(AppError::Conflict(format!(
            "Form '{form_id}' already has permanent fields"
        ))),
        SetOnce::Missing => Err(AppError::NotFound(format!(
            "Form with ID '{form_id}' does not exist"
        ))),
    }
}
