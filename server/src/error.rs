//! HTTP-facing error type for the auth and proxy routes.
//!
//! The route guard never produces these: its failures degrade to a redirect.

use axum::Json;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::services::backend::BackendError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not authenticated")]
    Unauthenticated,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, Json(serde_json::json!({ "error": "not authenticated" }))).into_response()
            }
            Self::Backend(BackendError::Rejected { status, content_type, body }) => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                let mut headers = HeaderMap::new();
                if let Some(value) = content_type.and_then(|ct| HeaderValue::from_str(&ct).ok()) {
                    headers.insert(CONTENT_TYPE, value);
                }
                (status, headers, body).into_response()
            }
            Self::Backend(BackendError::InvalidPath(path)) => {
                tracing::warn!(path = %path, "refusing backend path");
                (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": "invalid path" }))).into_response()
            }
            Self::Backend(ref e) => {
                tracing::error!(error = %e, "backend call failed");
                (StatusCode::BAD_GATEWAY, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
            }
        }
    }
}
