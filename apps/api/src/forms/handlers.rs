use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::models::{CreateFormRequest, Form, FormTemplate};
use super::service;
use crate::auth::{AdminCaller, Caller};
use crate::errors::AppError;
use crate::fields::replace::ReplaceExtraFieldsRequest;
use crate::state::AppState;

/// GET /forms/:form_id
pub async fn handle_get_form(
    State(state): State<AppState>,
    _caller: Caller,
    Path(form_id): Path<String>,
) -> Result<Json<FormTemplate>, AppError> {
    Ok(Json(
        service::get_template(state.forms.as_ref(), &form_id).await?,
    ))
}

/// POST /forms
pub async fn handle_create_form(
    State(state): State<AppState>,
    AdminCaller(caller): AdminCaller,
    Json(req): Json<CreateFormRequest>,
) -> Result<(StatusCode, Json<Form>), AppError> {
    let form = service::create_form(state.forms.as_ref(), &caller, req).await?;
    Ok((StatusCode::CREATED, Json(form)))
}

/// PUT /forms/:form_id/fields
pub async fn handle_replace_fields(
    State(state): State<AppState>,
    AdminCaller(caller): AdminCaller,
    Path(form_id): Path<String>,
    Json(req): Json<ReplaceExtraFieldsRequest>,
) -> Result<Json<Form>, AppError> {
    let form = service::replace_extra_fields(state.forms.as_ref(), &caller, &form_id, req).await?;
    Ok(Json(form))
}

/// POST /admin/forms/:form_id/permanent-fields
pub async fn handle_backfill_permanent_fields(
    State(state): State<AppState>,
    _admin: AdminCaller,
    Path(form_id): Path<String>,
) -> Result<Json<Form>, AppError> {
    let form = service::backfill_permanent_fields(state.forms.as_ref(), &form_id).await?;
    Ok(Json(form))
}
