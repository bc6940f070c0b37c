//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! API routes (auth cookies, backend proxy, health) and the static site share
//! one Axum router. The route guard wraps all of it, so dashboard pages
//! served from `SITE_DIR` are only reachable with a matching session role.

pub mod auth;
pub mod guard;
pub mod proxy;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{any, get, post};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Full application router: API routes + static site, behind the route guard.
pub fn app(state: AppState) -> Router {
    let site = ServeDir::new(&state.config.site_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/proxy/{*path}", any(proxy::forward))
        .route("/healthz", get(healthz))
        .fallback_service(site)
        .layer(middleware::from_fn_with_state(state.clone(), guard::route_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
