use axum::Json;
use serde::Serialize;

use super::access::Caller;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallerProfile {
    pub uid: String,
    pub email: String,
    pub email_verified: bool,
    pub is_admin: bool,
}

/// GET /me
pub async fn handle_me(caller: Caller) -> Json<CallerProfile> {
    Json(CallerProfile {
        is_admin: caller.is_admin(),
        uid: caller.uid,
        email: caller.email,
        email_verified: caller.email_verified,
    })
}
