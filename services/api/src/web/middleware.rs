//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::web::{protocol::HttpError, state::AppState};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "pokemon_auth_token";

/// Middleware that verifies the session token and exposes the session to handlers.
///
/// Candidate tokens come from the session cookie, then an
/// `Authorization: Bearer` header; the first one the gate accepts wins, so a
/// stale cookie does not mask a valid bearer token. The decoded `Session` is
/// inserted into request extensions. Missing and invalid tokens are both 401.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    // 1. Extract the candidate tokens
    let tokens = session_tokens(req.headers());
    if tokens.is_empty() {
        return Err(HttpError::unauthorized());
    }

    // 2. Verify them with the session gate
    let session = tokens
        .iter()
        .find_map(|token| state.gate.verify_token(token))
        .ok_or_else(|| {
            debug!("Rejected request with {} invalid session token(s)", tokens.len());
            HttpError::unauthorized()
        })?;

    // 3. Insert the session into request extensions
    req.extensions_mut().insert(session);

    // 4. Continue to the handler
    Ok(next.run(req).await)
}

/// Collects the session tokens presented in the cookie header and the bearer
/// authorization header, cookie first.
pub fn session_tokens(headers: &HeaderMap) -> Vec<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .find_map(|c| {
            c.trim()
                .strip_prefix(SESSION_COOKIE)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .filter(|t| !t.is_empty());

    let from_bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    from_cookie
        .into_iter()
        .chain(from_bearer)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_token_is_tried_before_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; pokemon_auth_token=abc.def.ghi"),
        );
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer other"));
        assert_eq!(session_tokens(&headers), vec!["abc.def.ghi", "other"]);
    }

    #[test]
    fn token_falls_back_to_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(session_tokens(&headers), vec!["abc"]);
    }

    #[test]
    fn empty_or_lookalike_cookies_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("pokemon_auth_token=; pokemon_auth_token_old=zzz"),
        );
        assert!(session_tokens(&headers).is_empty());
    }
}
