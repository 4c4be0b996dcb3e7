pub mod auth;
pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;

pub use auth::{login_handler, logout_handler, session_handler};
pub use middleware::require_auth;
pub use rest::{get_pokemon_handler, list_pokemons_handler};

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use state::AppState;
use std::sync::Arc;

/// Builds the API router: login/logout are public, everything else sits
/// behind the session gate.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/login", post(login_handler))
        .route("/api/logout", post(logout_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/api/session", get(session_handler))
        .route("/api/pokemons", get(list_pokemons_handler))
        .route("/api/pokemons/{id}", get(get_pokemon_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}
