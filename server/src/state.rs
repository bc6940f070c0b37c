//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into handlers and the guard middleware via the
//! `State` extractor. Everything in it is read-only after startup, so it is
//! a cheap `Arc` clone per request.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::backend::Backend;
use crate::services::guard::ProtectedRoutes;

/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub routes: Arc<ProtectedRoutes>,
    pub backend: Arc<dyn Backend>,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig, routes: ProtectedRoutes, backend: Arc<dyn Backend>) -> Self {
        Self { config: Arc::new(config), routes: Arc::new(routes), backend }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
