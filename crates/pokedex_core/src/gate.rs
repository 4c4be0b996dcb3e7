//! crates/pokedex_core/src/gate.rs
//!
//! The session gate: validates login input, checks credentials against a
//! pluggable store, and issues/verifies time-limited session tokens.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::domain::{LoginGrant, Session, User};
use crate::ports::{CredentialStore, PortError, PortResult, TokenSigner};

pub const DEFAULT_SESSION_TTL_DAYS: i64 = 7;
const MIN_PASSWORD_LEN: usize = 3;

#[derive(Clone)]
pub struct SessionGate {
    credentials: Arc<dyn CredentialStore>,
    signer: Arc<dyn TokenSigner>,
    ttl: Duration,
}

impl SessionGate {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        signer: Arc<dyn TokenSigner>,
        ttl: Duration,
    ) -> Self {
        Self {
            credentials,
            signer,
            ttl,
        }
    }

    /// Checks a credential pair. Malformed input is `InvalidInput`; a wrong
    /// pair is `Ok(false)`.
    pub async fn authenticate(&self, username: &str, password: &str) -> PortResult<bool> {
        let username = validate_login_input(username, password)?;
        self.credentials.verify(username, password).await
    }

    /// Authenticates and, on success, issues a token for the trimmed username.
    pub async fn login(&self, username: &str, password: &str) -> PortResult<LoginGrant> {
        if !self.authenticate(username, password).await? {
            return Err(PortError::InvalidCredentials);
        }

        let username = username.trim();
        let user = self
            .credentials
            .find_user(username)
            .await?
            .unwrap_or_else(|| User {
                username: username.to_string(),
            });
        let session = self.new_session(&user.username, Utc::now());
        let token = self.signer.sign(&session)?;

        Ok(LoginGrant {
            token,
            user,
            session,
        })
    }

    pub fn issue_token(&self, subject: &str) -> PortResult<String> {
        self.issue_token_at(subject, Utc::now())
    }

    pub fn issue_token_at(&self, subject: &str, now: DateTime<Utc>) -> PortResult<String> {
        self.signer.sign(&self.new_session(subject, now))
    }

    /// Returns the session carried by `token`, or `None` for anything that is
    /// malformed, badly signed, or expired.
    pub fn verify_token(&self, token: &str) -> Option<Session> {
        self.verify_token_at(token, Utc::now())
    }

    pub fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
        let session = self.signer.decode(token)?;
        if session.is_expired_at(now) {
            debug!("Rejected expired session token for '{}'", session.subject);
            return None;
        }
        Some(session)
    }

    fn new_session(&self, subject: &str, now: DateTime<Utc>) -> Session {
        Session {
            subject: subject.to_string(),
            issued_at: now,
            expires_at: now + self.ttl,
        }
    }
}

/// Returns the trimmed username when the pair is well-formed.
fn validate_login_input<'a>(username: &'a str, password: &str) -> PortResult<&'a str> {
    let username = username.trim();
    if username.is_empty() {
        return Err(PortError::InvalidInput("Username is required".to_string()));
    }
    if password.trim().is_empty() {
        return Err(PortError::InvalidInput("Password is required".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PortError::InvalidInput(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(username)
}
