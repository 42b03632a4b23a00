pub mod health;

use axum::{
    http::{Method, Uri},
    routing::{delete, get, post, put},
    Router,
};

use crate::auth::handlers as auth;
use crate::errors::AppError;
use crate::forms::handlers as forms;
use crate::state::AppState;
use crate::submissions::handlers as submissions;

async fn route_not_found(method: Method, uri: Uri) -> AppError {
    AppError::NotFound(format!("Route {method} {} not found", uri.path()))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/me", get(auth::handle_me))
        // Forms
        .route("/forms", post(forms::handle_create_form))
        .route("/forms/:form_id", get(forms::handle_get_form))
        .route("/forms/:form_id/fields", put(forms::handle_replace_fields))
        .route(
            "/admin/forms/:form_id/permanent-fields",
            post(forms::handle_backfill_permanent_fields),
        )
        // Submissions
        .route(
            "/forms/:form_id/submissions",
            post(submissions::handle_create_submission),
        )
        .route(
            "/admin/forms/:form_id/submissions",
            get(submissions::handle_list_form_submissions),
        )
        .route(
            "/admin/submissions/:submission_id",
            get(submissions::handle_get_submission),
        )
        .route("/my-submissions", get(submissions::handle_my_submissions))
        .route(
            "/submissions/:submission_id",
            delete(submissions::handle_delete_submission),
        )
        .fallback(route_not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests;
