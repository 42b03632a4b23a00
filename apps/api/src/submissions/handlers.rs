use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::models::{
    CreateSubmissionRequest, DeletedResponse, FormSubmissionsResponse, MySubmissionsResponse,
    Submission,
};
use super::service;
use crate::auth::{AdminCaller, Caller};
use crate::errors::AppError;
use crate::state::AppState;
use crate::store::SubmissionFilter;

/// POST /forms/:form_id/submissions
pub async fn handle_create_submission(
    State(state): State<AppState>,
    caller: Caller,
    Path(form_id): Path<String>,
    Json(req): Json<CreateSubmissionRequest>,
) -> Result<(StatusCode, Json<Submission>), AppError> {
    let submission = service::create_submission(
        state.forms.as_ref(),
        state.submissions.as_ref(),
        &caller,
        &form_id,
        req,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

/// GET /admin/forms/:form_id/submissions
pub async fn handle_list_form_submissions(
    State(state): State<AppState>,
    _admin: AdminCaller,
    Path(form_id): Path<String>,
) -> Result<Json<FormSubmissionsResponse>, AppError> {
    let submissions =
        service::list_for_form(state.forms.as_ref(), state.submissions.as_ref(), &form_id)
            .await?;
    Ok(Json(FormSubmissionsResponse {
        form_id,
        total: submissions.len(),
        submissions,
    }))
}

/// GET /admin/submissions/:submission_id
pub async fn handle_get_submission(
    State(state): State<AppState>,
    _admin: AdminCaller,
    Path(submission_id): Path<String>,
) -> Result<Json<Submission>, AppError> {
    Ok(Json(
        service::get_submission(state.submissions.as_ref(), &submission_id).await?,
    ))
}

/// GET /my-submissions
pub async fn handle_my_submissions(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<MySubmissionsResponse>, AppError> {
    let submissions = service::list_newest_first(
        state.submissions.as_ref(),
        &SubmissionFilter::User(caller.uid),
    )
    .await?;
    Ok(Json(MySubmissionsResponse {
        total: submissions.len(),
        submissions,
    }))
}

/// DELETE /submissions/:submission_id
pub async fn handle_delete_submission(
    State(state): State<AppState>,
    caller: Caller,
    Path(submission_id): Path<String>,
) -> Result<Json<DeletedResponse>, AppError> {
    service::delete_submission(state.submissions.as_ref(), &caller, &submission_id).await?;
    Ok(Json(DeletedResponse {
        message: "Submission deleted successfully",
        id: submission_id,
    }))
}
