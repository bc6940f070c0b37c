//! Shared session vocabulary for the route guard and the session observer.
//!
//! This crate owns the names and shapes both sides agree on: the cookie and
//! `localStorage` keys written by the login flow, the broadcast event names,
//! and the user record whose `type` field carries the role discriminator.
//! The record is kept open-ended (`serde_json::Map`) because the backend owns
//! its schema; only `type` is interpreted here.

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Cookie and storage key holding the JSON-encoded user record.
pub const USER_KEY: &str = "oskar_user";
/// Cookie and storage key holding the opaque auth token.
pub const TOKEN_KEY: &str = "oskar_token";
/// Storage key older clients wrote the token under. Read as a fallback only.
pub const LEGACY_TOKEN_KEY: &str = "token";

/// App-defined event fired after login/logout in the same tab.
pub const AUTH_STATE_CHANGED_EVENT: &str = "authStateChanged";
/// App-defined event asking header widgets to re-read the session.
pub const FORCE_HEADER_UPDATE_EVENT: &str = "forceHeaderUpdate";

/// Application root. The only redirect destination the guard ever produces.
pub const HOME_PATH: &str = "/";

// =============================================================================
// ERRORS
// =============================================================================

/// Error returned by [`parse_session_user`].
#[derive(Debug, thiserror::Error)]
pub enum SessionParseError {
    /// The raw value is not valid JSON.
    #[error("user record is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    /// The JSON value is not an object.
    #[error("user record is not a json object")]
    NotAnObject,
    /// The object has no string `type` discriminator.
    #[error("user record has no string `type` field")]
    MissingType,
}

// =============================================================================
// ROLE
// =============================================================================

/// Role discriminator taken verbatim from a user record's `type` field.
///
/// Compared by exact string equality. No case folding or trimming: `"Admin"`
/// and `"admin"` are different roles.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

// =============================================================================
// SESSION USER
// =============================================================================

/// User record stored alongside the token by the login flow.
///
/// Only `type` is required. Every other field is carried through untouched so
/// UI consumers see exactly what the backend returned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "type")]
    pub role: Role,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl SessionUser {
    /// Look up an arbitrary record field such as `"email"` or `"nom"`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Build a record from an already-decoded JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`SessionParseError::NotAnObject`] or
    /// [`SessionParseError::MissingType`] when the value has the wrong shape.
    pub fn from_value(value: Value) -> Result<Self, SessionParseError> {
        let Value::Object(mut fields) = value else {
            return Err(SessionParseError::NotAnObject);
        };
        let Some(Value::String(role)) = fields.remove("type") else {
            return Err(SessionParseError::MissingType);
        };
        Ok(Self { role: Role(role), fields })
    }

    /// Encode the record back to the JSON text stored in cookies/storage.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_owned())
    }
}

/// Parse the raw JSON text of a `oskar_user` cookie or storage value.
///
/// # Errors
///
/// Returns a [`SessionParseError`] when the text is not JSON, not an object,
/// or lacks a string `type` field.
pub fn parse_session_user(raw: &str) -> Result<SessionUser, SessionParseError> {
    let value: Value = serde_json::from_str(raw)?;
    SessionUser::from_value(value)
}
