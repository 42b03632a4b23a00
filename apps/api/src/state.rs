use std::sync::Arc;

use crate::auth::{AdminAllowList, TokenVerifier};
use crate::store::{FormStore, SubmissionStore};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub forms: Arc<dyn FormStore>,
    pub submissions: Arc<dyn SubmissionStore>,
    pub verifier: Arc<dyn TokenVerifier>,
    /// Fixed at startup from `ADMIN_EMAILS`.
    pub admins: Arc<AdminAllowList>,
}
