//! `ANY /api/proxy/{*path}`: relay browser API calls to the REST backend.
//!
//! The browser never talks to the backend directly. The proxy attaches the
//! session token as a bearer credential when the caller did not send its own
//! `Authorization` header, and otherwise relays the exchange verbatim.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use identity::TOKEN_KEY;

use crate::error::ApiError;
use crate::services::backend::{ForwardRequest, ForwardResponse, check_relative_path};
use crate::state::AppState;

/// Pick the credential to send upstream: the caller's own header first,
/// then the session cookie token.
pub(crate) fn upstream_authorization(headers: &HeaderMap, jar: &CookieJar) -> Option<String> {
    if let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return Some(value.to_owned());
    }
    jar.get(TOKEN_KEY)
        .map(|c| c.value())
        .filter(|token| !token.is_empty())
        .map(|token| format!("Bearer {token}"))
}

fn into_response(forwarded: ForwardResponse) -> Response {
    let status = StatusCode::from_u16(forwarded.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut headers = HeaderMap::new();
    if let Some(value) = forwarded.content_type.and_then(|ct| HeaderValue::from_str(&ct).ok()) {
        headers.insert(CONTENT_TYPE, value);
    }
    (status, headers, forwarded.body).into_response()
}

pub async fn forward(
    State(state): State<AppState>,
    Path(path): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    jar: CookieJar,
    body: Bytes,
) -> Result<Response, ApiError> {
    check_relative_path(&path)?;
    let request = ForwardRequest {
        method,
        query: uri.query().map(str::to_owned),
        content_type: headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()).map(str::to_owned),
        authorization: upstream_authorization(&headers, &jar),
        path,
        body,
    };

    tracing::debug!(method = %request.method, path = %request.path, "proxying api request");
    let forwarded = state.backend.forward(request).await?;
    if forwarded.status >= 500 {
        tracing::warn!(status = forwarded.status, "backend answered with server error");
    }
    Ok(into_response(forwarded))
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;
