//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for login, logout, and session inspection.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use pokedex_core::domain::Session;
use std::sync::Arc;
use tracing::{info, warn};

use crate::web::{
    middleware::SESSION_COOKIE,
    protocol::{
        ApiResponse, ErrorReason, ErrorResponse, HttpError, LoginRequest, LoginResponse,
        SessionDto,
    },
    state::AppState,
};

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/login - Exchange the credential pair for a session token
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed body, username or password", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, HttpError> {
    // 1. Reject bodies that are not a JSON credential pair
    let Json(req) = body.map_err(|rejection| {
        warn!("Login body rejected: {}", rejection.body_text());
        HttpError::new(
            StatusCode::BAD_REQUEST,
            ErrorReason::InvalidInput,
            rejection.body_text(),
        )
    })?;

    // 2. Validate and check the credentials, then sign a token
    let grant = state
        .gate
        .login(&req.username, &req.password)
        .await
        .map_err(|e| {
            warn!("Login rejected: {}", e);
            HttpError::from(e)
        })?;
    info!("User '{}' logged in", grant.user.username);

    // 3. Create a session cookie that lives exactly as long as the token
    let max_age = (grant.session.expires_at - grant.session.issued_at).num_seconds();
    let cookie = format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        SESSION_COOKIE, grant.token, max_age
    );

    // 4. Return response with cookie
    let response = LoginResponse {
        success: true,
        token: grant.token,
        user: grant.user.into(),
        message: "Login successful".to_string(),
    };

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)))
}

/// POST /api/logout - Clear the session cookie
///
/// Tokens are stateless, so logging out only asks the client to drop its copy.
#[utoipa::path(
    post,
    path = "/api/logout",
    responses(
        (status = 200, description = "Logout successful")
    )
)]
pub async fn logout_handler() -> impl IntoResponse {
    let cookie = format!(
        "{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0",
        SESSION_COOKIE
    );
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(ApiResponse::ok("Logged out")),
    )
}

/// GET /api/session - Describe the session behind the presented token
#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "The current session", body = SessionDto),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    )
)]
pub async fn session_handler(Extension(session): Extension<Session>) -> impl IntoResponse {
    Json(ApiResponse::ok(SessionDto::from(session)))
}
