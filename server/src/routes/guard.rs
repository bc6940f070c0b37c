//! Route guard middleware.
//!
//! Runs on every request in front of the router. The decision itself lives
//! in `services::guard`; this layer only reads cookies and applies it.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use identity::HOME_PATH;

use crate::services::guard::{GuardDecision, canonical_path, evaluate};
use crate::services::session::read_session;
use crate::state::AppState;

/// Pass the request through, or answer with a temporary redirect to `/`.
pub async fn route_guard(State(state): State<AppState>, jar: CookieJar, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let lookup = read_session(&jar);
    let session = lookup.session();

    match evaluate(&state.routes, path, session) {
        GuardDecision::Allow => {
            tracing::debug!(
                %path,
                protected = canonical_path(path).is_some_and(|p| state.routes.is_protected(&p)),
                authenticated = session.is_some(),
                "route guard: allow"
            );
            next.run(request).await
        }
        GuardDecision::RedirectHome => {
            tracing::info!(
                %path,
                role = session.map(|s| s.user.role.as_str()),
                "route guard: redirecting to home"
            );
            Redirect::temporary(HOME_PATH).into_response()
        }
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
