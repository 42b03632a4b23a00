pub mod access;
pub mod extract;
pub mod handlers;
pub mod token;

pub use access::{AdminAllowList, Caller, Role};
pub use extract::AdminCaller;
pub use token::{JwtVerifier, TokenVerifier, VerifiedToken};

use thiserror::Error;

use crate::errors::AppError;

/// Reasons a request fails authentication. All of them surface as 401.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header. Expected format: Bearer <token>")]
    MissingHeader,

    #[error("Invalid Authorization header format. Expected: Bearer <token>")]
    MalformedHeader,

    #[error("No token provided")]
    EmptyToken,

    #[error("Token has expired. Please sign in again.")]
    Expired,

    #[error("Invalid token format")]
    InvalidFormat,

    #[error("Failed to authenticate token")]
    Invalid,

    #[error("No email found in authentication token. Please sign in with a valid account.")]
    MissingEmail,

    #[error("Failed to authenticate token")]
    KeyFetch(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        if let AuthError::KeyFetch(reason) = &err {
            tracing::error!("Signing key fetch failed: {reason}");
        }
        AppError::Unauthorized(err.to_string())
    }
}
