//! crates/pokedex_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like the PokeAPI or a JWT library.

use async_trait::async_trait;
use crate::domain::{EntityDetail, EntityKey, EntitySummary, Session, User};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., network, signing).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    /// Caller-supplied shape or range violation. Never retried.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Item not found: {0}")]
    NotFound(String),
    /// The upstream catalog could not be reached or answered with garbage.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Fetches the whole upstream index, in upstream order.
    async fn fetch_all_summaries(&self) -> PortResult<Vec<EntitySummary>>;

    /// Fetches one full record. Absent records are `PortError::NotFound`.
    async fn fetch_detail(&self, key: &EntityKey) -> PortResult<EntityDetail>;
}

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Checks a username/password pair. A mismatch is `Ok(false)`, not an error.
    async fn verify(&self, username: &str, password: &str) -> PortResult<bool>;

    async fn find_user(&self, username: &str) -> PortResult<Option<User>>;
}

pub trait TokenSigner: Send + Sync {
    fn sign(&self, session: &Session) -> PortResult<String>;

    /// Checks the signature and shape of a token. Expiry is left to the caller.
    fn decode(&self, token: &str) -> Option<Session>;
}
