//! services/api/src/adapters/credentials.rs
//!
//! A single configured username/password pair.
//! It implements the `CredentialStore` port from the `core` crate; a database
//! or identity-provider backed store can replace it without touching callers.

use async_trait::async_trait;
use pokedex_core::domain::User;
use pokedex_core::ports::{CredentialStore, PortResult};

pub struct StaticCredentialStore {
    username: String,
    password: String,
}

impl StaticCredentialStore {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[async_trait]
impl CredentialStore for StaticCredentialStore {
    async fn verify(&self, username: &str, password: &str) -> PortResult<bool> {
        Ok(username == self.username && password == self.password)
    }

    async fn find_user(&self, username: &str) -> PortResult<Option<User>> {
        Ok((username == self.username).then(|| User {
            username: self.username.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn only_the_exact_pair_verifies() {
        let store = StaticCredentialStore::new("admin", "admin");
        assert!(store.verify("admin", "admin").await.unwrap());
        assert!(!store.verify("Admin", "admin").await.unwrap());
        assert!(!store.verify("admin", "admin ").await.unwrap());
    }

    #[tokio::test]
    async fn finds_only_the_configured_user() {
        let store = StaticCredentialStore::new("misty", "starmie");
        assert_eq!(
            store.find_user("misty").await.unwrap(),
            Some(User {
                username: "misty".to_string()
            })
        );
        assert_eq!(store.find_user("brock").await.unwrap(), None);
    }
}
