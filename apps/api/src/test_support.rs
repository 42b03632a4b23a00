//! Shared fixtures for router-level tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::auth::{AdminAllowList, AuthError, TokenVerifier, VerifiedToken};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::MemoryStore;

pub const ADMIN_TOKEN: &str = "admin-token";
pub const ALICE_TOKEN: &str = "alice-token";
pub const BOB_TOKEN: &str = "bob-token";
pub const NO_EMAIL_TOKEN: &str = "no-email-token";

/// Accepts a fixed set of opaque tokens.
pub struct StaticTokenVerifier {
    tokens: HashMap<String, VerifiedToken>,
}

impl StaticTokenVerifier {
    pub fn standard() -> Self {
        let user = |uid: &str, email: Option<&str>| VerifiedToken {
            uid: uid.to_string(),
            email: email.map(str::to_string),
            email_verified: email.is_some(),
        };
        let tokens = [
            (ADMIN_TOKEN, user("admin-uid", Some("Boss@Example.com"))),
            (ALICE_TOKEN, user("alice-uid", Some("alice@example.com"))),
            (BOB_TOKEN, user("bob-uid", Some("bob@example.com"))),
            (NO_EMAIL_TOKEN, user("anon-uid", None)),
        ]
        .into_iter()
        .map(|(t, v)| (t.to_string(), v))
        .collect();
        Self { tokens }
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedToken, AuthError> {
        self.tokens.get(token).cloned().ok_or(AuthError::Invalid)
    }
}

pub fn test_app(store: Arc<MemoryStore>) -> Router {
    build_router(AppState {
        forms: store.clone(),
        submissions: store,
        verifier: Arc::new(StaticTokenVerifier::standard()),
        admins: Arc::new(AdminAllowList::from_csv("boss@example.com")),
    })
}

/// Sends one request through the router and decodes the body: JSON when it parses,
/// a string otherwise, Null when empty.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}
