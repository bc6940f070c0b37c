//! REST backend client used by the login route and the API proxy.
//!
//! Thin HTTP wrapper over `reqwest`. Response parsing is kept in pure
//! functions so it can be tested without a live backend.

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::Method;
use identity::SessionUser;
use serde_json::Value;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const LOGIN_PATH: &str = "auth/login";

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("failed to build http client: {0}")]
    HttpClientBuild(String),
    #[error("backend request failed: {0}")]
    Request(String),
    #[error("backend returned {status}")]
    Rejected {
        status: u16,
        content_type: Option<String>,
        body: String,
    },
    #[error("unexpected backend response: {0}")]
    InvalidResponse(String),
    #[error("invalid backend path: {0}")]
    InvalidPath(String),
}

/// Successful login as returned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginResponse {
    pub user: SessionUser,
    pub token: String,
}

/// A request to relay verbatim to the backend.
#[derive(Debug, Clone)]
pub struct ForwardRequest {
    pub method: Method,
    /// Backend-relative path, without leading slash.
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    /// Full `Authorization` header value to send, if any.
    pub authorization: Option<String>,
    pub body: Bytes,
}

/// The backend's answer, relayed verbatim to the caller.
#[derive(Debug, Clone)]
pub struct ForwardResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Backend operations the HTTP edge depends on. Enables mocking in tests.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Exchange credentials for a user record and token.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Rejected`] for non-2xx answers and
    /// [`BackendError::InvalidResponse`] when the body lacks a usable
    /// `user`/`token` pair.
    async fn login(&self, credentials: &Value) -> Result<LoginResponse, BackendError>;

    /// Relay a request and return whatever the backend answered.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Request`] only for transport failures; HTTP
    /// error statuses are part of a successful [`ForwardResponse`].
    async fn forward(&self, request: ForwardRequest) -> Result<ForwardResponse, BackendError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a client for `base_url` (no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::HttpClientBuild`] if the TLS stack cannot be
    /// initialized.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| BackendError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.into() })
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, credentials: &Value) -> Result<LoginResponse, BackendError> {
        let response = self
            .http
            .post(backend_url(&self.base_url, LOGIN_PATH, None)?)
            .json(credentials)
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = content_type_of(&response);
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(BackendError::Rejected { status, content_type, body: text });
        }
        parse_login_response(&text)
    }

    async fn forward(&self, request: ForwardRequest) -> Result<ForwardResponse, BackendError> {
        let url = backend_url(&self.base_url, &request.path, request.query.as_deref())?;
        let mut builder = self.http.request(request.method, url).body(request.body);
        if let Some(content_type) = request.content_type {
            builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        if let Some(authorization) = request.authorization {
            builder = builder.header(reqwest::header::AUTHORIZATION, authorization);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = content_type_of(&response);
        let body = response
            .bytes()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        Ok(ForwardResponse { status, content_type, body })
    }
}

fn content_type_of(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

// =============================================================================
// PURE HELPERS
// =============================================================================

/// Reject backend-relative paths that would climb out of the base URL.
///
/// Segments are split on both slash kinds and decoded once more, since URL
/// resolution treats `%2e%2e` as `..`.
pub(crate) fn check_relative_path(path: &str) -> Result<(), BackendError> {
    let climbs = path.split(['/', '\\']).any(|segment| {
        let decoded = urlencoding::decode(segment).map_or_else(|_| segment.into(), |d| d);
        decoded == ".." || decoded == "."
    });
    if climbs {
        return Err(BackendError::InvalidPath(path.to_owned()));
    }
    Ok(())
}

/// Join the backend base URL with a relative path and optional query string.
pub(crate) fn backend_url(base: &str, path: &str, query: Option<&str>) -> Result<String, BackendError> {
    check_relative_path(path)?;
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Ok(match query.filter(|q| !q.is_empty()) {
        Some(query) => format!("{base}/{path}?{query}"),
        None => format!("{base}/{path}"),
    })
}

/// Parse the backend login body: `{ "user": {..., "type": ...}, "token": "..." }`.
pub(crate) fn parse_login_response(body: &str) -> Result<LoginResponse, BackendError> {
    let value: Value =
        serde_json::from_str(body).map_err(|_| BackendError::InvalidResponse(format!("not json: {body}")))?;

    let token = value
        .get("token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| BackendError::InvalidResponse("missing token".into()))?
        .to_owned();

    let user = value
        .get("user")
        .cloned()
        .ok_or_else(|| BackendError::InvalidResponse("missing user".into()))?;
    let user = SessionUser::from_value(user).map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

    Ok(LoginResponse { user, token })
}

#[cfg(test)]
#[path = "backend_test.rs"]
mod tests;
