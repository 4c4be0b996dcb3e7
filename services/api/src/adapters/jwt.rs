//! services/api/src/adapters/jwt.rs
//!
//! HS256 JSON Web Tokens for session tokens.
//! It implements the `TokenSigner` port from the `core` crate.

use chrono::DateTime;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use pokedex_core::domain::Session;
use pokedex_core::ports::{PortError, PortResult, TokenSigner};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

#[derive(Serialize, Deserialize, Clone)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

pub struct JwtTokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtTokenSigner {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // The session gate compares `exp` against its own clock.
        validation.validate_exp = false;
        validation.required_spec_claims =
            HashSet::from(["sub".to_string(), "exp".to_string()]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl TokenSigner for JwtTokenSigner {
    fn sign(&self, session: &Session) -> PortResult<String> {
        let claims = Claims {
            sub: session.subject.clone(),
            iat: session.issued_at.timestamp(),
            exp: session.expires_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| PortError::Unexpected(format!("Failed to sign session token: {}", e)))
    }

    fn decode(&self, token: &str) -> Option<Session> {
        let data = match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => data,
            Err(e) => {
                debug!("JWT verification failed: {}", e);
                return None;
            }
        };

        Some(Session {
            subject: data.claims.sub,
            issued_at: DateTime::from_timestamp(data.claims.iat, 0)?,
            expires_at: DateTime::from_timestamp(data.claims.exp, 0)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn session(expires_in: Duration) -> Session {
        let issued_at = DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap();
        Session {
            subject: "admin".to_string(),
            issued_at,
            expires_at: issued_at + expires_in,
        }
    }

    #[test]
    fn signed_tokens_decode_back_to_the_session() {
        let signer = JwtTokenSigner::new("test-secret");
        let original = session(Duration::days(7));

        let token = signer.sign(&original).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(signer.decode(&token), Some(original));
    }

    #[test]
    fn expired_tokens_still_decode_so_the_gate_can_judge_them() {
        let signer = JwtTokenSigner::new("test-secret");
        let token = signer.sign(&session(Duration::days(-1))).unwrap();
        assert!(signer.decode(&token).is_some());
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let ours = JwtTokenSigner::new("test-secret");
        let theirs = JwtTokenSigner::new("other-secret");
        let token = theirs.sign(&session(Duration::days(7))).unwrap();
        assert!(ours.decode(&token).is_none());
    }

    #[test]
    fn tampered_and_malformed_tokens_are_rejected() {
        let signer = JwtTokenSigner::new("test-secret");
        let token = signer.sign(&session(Duration::days(7))).unwrap();

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[1] = format!("{}x", parts[1]);
        assert!(signer.decode(&parts.join(".")).is_none());

        assert!(signer.decode("").is_none());
        assert!(signer.decode("a.b.c").is_none());
        assert!(signer.decode("definitely-not-a-jwt").is_none());
    }
}
