//! Caller classification and the rules gating mutations.

use std::collections::HashSet;

use serde::Serialize;

use super::AuthError;

/// Emails granted admin rights. Built once from configuration; compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList {
    emails: HashSet<String>,
}

impl AdminAllowList {
    /// Parses a comma-separated list, trimming and lower-casing entries and dropping blanks.
    pub fn from_csv(raw: &str) -> Self {
        Self {
            emails: raw
                .split(',')
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    pub fn contains(&self, email: &str) -> bool {
        self.emails.contains(&email.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    pub fn role_for(&self, email: &str) -> Role {
        if self.contains(email) {
            Role::Admin
        } else {
            Role::Member
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

/// An authenticated caller. Only exists once a token has verified and carried an email.
#[derive(Debug, Clone)]
pub struct Caller {
    pub uid: String,
    pub email: String,
    pub email_verified: bool,
    pub role: Role,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Owners may mutate their own submissions; admins may mutate any.
    pub fn can_mutate_submission(&self, owner_uid: &str) -> bool {
        self.uid == owner_uid || self.is_admin()
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;
    let mut parts = header.split(' ');
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AuthError::MalformedHeader);
    };
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::EmptyToken);
    }
    Ok(token)
}
