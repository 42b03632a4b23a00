//! Axum extractors that walk a request through
//! unauthenticated -> authenticated -> (admin | member).

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::access::{bearer_token, Caller};
use super::AuthError;
use crate::errors::AppError;
use crate::state::AppState;

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .map(|v| v.to_str().map_err(|_| AuthError::MalformedHeader))
            .transpose()?;
        let token = bearer_token(header)?;

        let verified = state.verifier.verify(token).await.map_err(|e| {
            tracing::warn!("Authentication failed: {e}");
            e
        })?;
        // The email is the authorization key; a token without one cannot be classified.
        let email = verified.email.ok_or(AuthError::MissingEmail)?;

        Ok(Caller {
            role: state.admins.role_for(&email),
            uid: verified.uid,
            email,
            email_verified: verified.email_verified,
        })
    }
}

/// A caller whose email is on the admin allow-list. Rejects everyone else with 403.
#[derive(Debug, Clone)]
pub struct AdminCaller(pub Caller);

#[async_trait]
impl FromRequestParts<AppState> for AdminCaller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let caller = Caller::from_request_parts(parts, state).await?;
        if !caller.is_admin() {
            return Err(AppError::Forbidden(
                "Admin access required. You do not have permission to perform this action."
                    .to_string(),
            ));
        }
        Ok(AdminCaller(caller))
    }
}
