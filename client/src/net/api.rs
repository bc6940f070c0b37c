//! REST helpers for the login flow.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR) and tests: login fails without a request, logout only
//! clears local state.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Result` outputs with a displayable message instead of panics,
//! so a failed login degrades to a form error.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use identity::SessionUser;
#[cfg(feature = "hydrate")]
use serde::Deserialize;
use serde_json::Value;

use crate::util::auth::clear_session;
#[cfg(feature = "hydrate")]
use crate::util::auth::persist_session;
use crate::util::auth_events::AuthEvents;
use crate::util::storage::SessionStorage;

#[cfg(any(test, feature = "hydrate"))]
const LOGIN_ENDPOINT: &str = "/api/auth/login";
#[cfg(feature = "hydrate")]
const LOGOUT_ENDPOINT: &str = "/api/auth/logout";

#[cfg(feature = "hydrate")]
#[derive(Deserialize)]
struct LoginBody {
    user: SessionUser,
    token: String,
}

#[cfg(any(test, feature = "hydrate"))]
fn login_failed_message(status: u16) -> String {
    match status {
        400 | 401 | 403 => "identifiants invalides".to_owned(),
        _ => format!("login failed: {status}"),
    }
}

/// Log in through `POST /api/auth/login`.
///
/// On success the edge has already set the session cookies; this mirrors the
/// session into `storage` and notifies `events` so mounted observers update.
///
/// # Errors
///
/// Returns a user-facing message when the request fails, the credentials are
/// rejected, or the call is made outside the browser.
pub async fn login<S: SessionStorage + ?Sized>(
    storage: &S,
    events: &AuthEvents,
    credentials: &Value,
) -> Result<SessionUser, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post(LOGIN_ENDPOINT)
            .json(credentials)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(login_failed_message(resp.status()));
        }
        let body = resp.json::<LoginBody>().await.map_err(|e| e.to_string())?;
        persist_session(storage, events, &body.user, &body.token);
        log::info!("signed in as {}", body.user.role);
        Ok(body.user)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (storage, events, credentials);
        Err("login is only available in the browser".to_owned())
    }
}

/// Log out: ask the edge to clear cookies, then clear local state.
///
/// Local state is cleared even if the request fails, so the UI never shows a
/// signed-in header after the user asked to leave.
pub async fn logout<S: SessionStorage + ?Sized>(storage: &S, events: &AuthEvents) {
    #[cfg(feature = "hydrate")]
    {
        if let Err(e) = gloo_net::http::Request::post(LOGOUT_ENDPOINT).send().await {
            log::warn!("logout request failed: {e}");
        }
    }
    clear_session(storage, events);
}
