use anyhow::{Context, Result};

use crate::auth::AdminAllowList;

/// Public keys used to verify Firebase-style ID tokens when no explicit URL is configured.
pub const DEFAULT_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent means the process runs on the in-memory store.
    pub database_url: Option<String>,
    pub admin_emails: AdminAllowList,
    pub auth: AuthConfig,
    pub port: u16,
    pub rust_log: String,
}

/// How incoming bearer tokens are verified.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwks_url: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    /// Local development only: verify HS256 tokens with a shared secret instead of JWKS.
    pub hs256_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            admin_emails: AdminAllowList::from_csv(
                &std::env::var("ADMIN_EMAILS").unwrap_or_default(),
            ),
            auth: AuthConfig {
                jwks_url: optional_env("AUTH_JWKS_URL")
                    .unwrap_or_else(|| DEFAULT_JWKS_URL.to_string()),
                issuer: optional_env("AUTH_ISSUER"),
                audience: optional_env("AUTH_AUDIENCE"),
                hs256_secret: optional_env("AUTH_HS256_SECRET"),
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Reads a variable, treating unset and blank the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
