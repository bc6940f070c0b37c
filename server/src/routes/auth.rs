//! Auth routes: cookie login, logout, and current-session lookup.
//!
//! Login is delegated to the REST backend. This edge only mirrors the
//! resulting session into the `oskar_user`/`oskar_token` cookies the route
//! guard reads, and echoes it back so the browser can copy it into
//! `localStorage` for the session observer.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use identity::{SessionUser, TOKEN_KEY, USER_KEY};
use serde::Serialize;
use serde_json::Value;
use time::Duration;

use crate::error::ApiError;
use crate::services::session::{encode_user_cookie, read_session};
use crate::state::AppState;

/// Body returned by a successful login.
#[derive(Debug, Serialize)]
pub struct LoginBody {
    pub user: SessionUser,
    pub token: String,
}

/// Session cookies. Neither is `HttpOnly`: the browser-side login helper
/// reads them back, same as the storage copy.
pub(crate) fn session_cookies(user: &SessionUser, token: &str, secure: bool) -> [Cookie<'static>; 2] {
    let user_cookie = Cookie::build((USER_KEY, encode_user_cookie(user)))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .build();
    let token_cookie = Cookie::build((TOKEN_KEY, token.to_owned()))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .build();
    [user_cookie, token_cookie]
}

/// Removal cookies for both session keys.
pub(crate) fn clear_session_cookies() -> [Cookie<'static>; 2] {
    [USER_KEY, TOKEN_KEY].map(|name| Cookie::build((name, "")).path("/").max_age(Duration::ZERO).build())
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/auth/login`: exchange credentials with the backend and set cookies.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(credentials): Json<Value>,
) -> Result<(CookieJar, Json<LoginBody>), ApiError> {
    let login = state.backend.login(&credentials).await?;
    tracing::info!(role = %login.user.role, "login succeeded");

    let [user_cookie, token_cookie] = session_cookies(&login.user, &login.token, state.config.cookie_secure);
    let jar = jar.add(user_cookie).add(token_cookie);
    Ok((jar, Json(LoginBody { user: login.user, token: login.token })))
}

/// `POST /api/auth/logout`: clear both session cookies.
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let [user_cookie, token_cookie] = clear_session_cookies();
    (jar.add(user_cookie).add(token_cookie), StatusCode::NO_CONTENT)
}

/// `GET /api/auth/me`: return the user record from the session cookie.
pub async fn me(jar: CookieJar) -> Result<Json<SessionUser>, ApiError> {
    read_session(&jar)
        .into_session()
        .map(|session| Json(session.user))
        .ok_or(ApiError::Unauthenticated)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
