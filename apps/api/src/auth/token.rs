//! Identity token verification.
//!
//! Tokens are issued by an external identity provider. `TokenVerifier` is the
//! seam; `JwtVerifier` checks RS256 tokens against the provider's published
//! JWKS, or HS256 tokens against a shared secret for local development.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{
    decode, decode_header, errors::ErrorKind, jwk::JwkSet, Algorithm, DecodingKey, Validation,
};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::AuthError;
use crate::config::AuthConfig;

/// How long a fetched key set is trusted before it is fetched again.
const JWKS_TTL: Duration = Duration::from_secs(60 * 60);

/// Minimum gap between fetches triggered by an unknown `kid` on a fresh key set.
const JWKS_MISS_REFETCH_INTERVAL: Duration = Duration::from_secs(60);

/// Identity asserted by a verified token. `email` may be absent; callers decide what that means.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedToken {
    pub uid: String,
    pub email: Option<String>,
    pub email_verified: bool,
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedToken, AuthError>;
}

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<bool>,
}

pub struct JwtVerifier {
    source: KeySource,
    validation: Validation,
}

enum KeySource {
    Secret(DecodingKey),
    Jwks(JwksCache),
}

impl JwtVerifier {
    pub fn from_config(config: &AuthConfig) -> Self {
        match &config.hs256_secret {
            Some(secret) => {
                info!("Verifying identity tokens with a shared HS256 secret");
                Self::with_secret(secret.as_bytes(), config)
            }
            None => {
                info!("Verifying identity tokens against {}", config.jwks_url);
                Self {
                    source: KeySource::Jwks(JwksCache::new(config.jwks_url.clone())),
                    validation: validation_for(Algorithm::RS256, config),
                }
            }
        }
    }

    pub fn with_secret(secret: &[u8], config: &AuthConfig) -> Self {
        Self {
            source: KeySource::Secret(DecodingKey::from_secret(secret)),
            validation: validation_for(Algorithm::HS256, config),
        }
    }
}

fn validation_for(alg: Algorithm, config: &AuthConfig) -> Validation {
    let mut validation = Validation::new(alg);
    if let Some(issuer) = &config.issuer {
        validation.set_issuer(&[issuer]);
    }
    match &config.audience {
        Some(audience) => validation.set_audience(&[audience]),
        None => validation.validate_aud = false,
    }
    validation
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedToken, AuthError> {
        let key = match &self.source {
            KeySource::Secret(key) => key.clone(),
            KeySource::Jwks(cache) => {
                let header = decode_header(token).map_err(|_| AuthError::InvalidFormat)?;
                let kid = header.kid.ok_or(AuthError::Invalid)?;
                cache.key_for(&kid).await?
            }
        };

        let claims = decode::<IdTokenClaims>(token, &key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => AuthError::InvalidFormat,
                other => {
                    debug!("Token rejected: {other:?}");
                    AuthError::Invalid
                }
            })?
            .claims;

        Ok(VerifiedToken {
            uid: claims.sub,
            email: claims.email.filter(|e| !e.trim().is_empty()),
            email_verified: claims.email_verified.unwrap_or(false),
        })
    }
}

struct CachedKeys {
    set: JwkSet,
    fetched_at: Instant,
}

struct JwksCache {
    url: String,
    http: reqwest::Client,
    keys: RwLock<Option<CachedKeys>>,
}

impl JwksCache {
    fn new(url: String) -> Self {
        Self {
            url,
            http: reqwest::Client::new(),
            keys: RwLock::new(None),
        }
    }

    /// Finds the key for `kid`. A stale key set is refetched; an unknown `kid` on a
    /// fresh one (key rotation) refetches at most once per `JWKS_MISS_REFETCH_INTERVAL`.
    /// Refetches happen under the write lock so concurrent misses share one fetch.
    async fn key_for(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(found) = lookup(self.keys.read().await.as_ref(), kid) {
            return found;
        }

        let mut guard = self.keys.write().await;
        // Another request may have refreshed the set while this one waited.
        if let Some(found) = lookup(guard.as_ref(), kid) {
            return found;
        }

        let set = self.fetch().await?;
        let key = decoding_key(&set, kid);
        *guard = Some(CachedKeys {
            set,
            fetched_at: Instant::now(),
        });
        key
    }

    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        debug!("Fetching signing keys from {}", self.url);
        self.http
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))
    }
}

/// Answers from the cache when it can: `None` means a fetch is due.
fn lookup(cached: Option<&CachedKeys>, kid: &str) -> Option<Result<DecodingKey, AuthError>> {
    let cached = cached?;
    let age = cached.fetched_at.elapsed();
    if age >= JWKS_TTL {
        return None;
    }
    if cached.set.find(kid).is_some() || age < JWKS_MISS_REFETCH_INTERVAL {
        return Some(decoding_key(&cached.set, kid));
    }
    None
}

fn decoding_key(set: &JwkSet, kid: &str) -> Result<DecodingKey, AuthError> {
    let jwk = set.find(kid).ok_or(AuthError::Invalid)?;
    DecodingKey::from_jwk(jwk).map_err(|_| AuthError::Invalid)
}
