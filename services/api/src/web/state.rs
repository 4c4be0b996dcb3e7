//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use pokedex_core::gate::SessionGate;
use pokedex_core::ports::CatalogService;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogService>,
    pub gate: SessionGate,
}
