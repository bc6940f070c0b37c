//! Session lookup from request cookies.
//!
//! DESIGN
//! ======
//! The login flow writes the user record to `oskar_user` (percent-encoded
//! JSON) and the token to `oskar_token`. Reading goes through the
//! [`SessionSource`] capability instead of a concrete cookie jar so the guard
//! can be evaluated against plain maps in tests.
//!
//! ERROR HANDLING
//! ==============
//! A malformed user cookie is never an error for the caller: it is logged and
//! reported as [`SessionLookup::Malformed`], which every consumer treats the
//! same as no session at all.

use std::collections::HashMap;
use std::hash::BuildHasher;

use axum_extra::extract::cookie::{Cookie, CookieJar};
use identity::{SessionParseError, SessionUser, TOKEN_KEY, USER_KEY, parse_session_user};

/// Read access to the cookies of the current request.
pub trait SessionSource {
    fn cookie_value(&self, name: &str) -> Option<String>;
}

impl SessionSource for CookieJar {
    fn cookie_value(&self, name: &str) -> Option<String> {
        self.get(name).map(Cookie::value).map(str::to_owned)
    }
}

impl<S: BuildHasher> SessionSource for HashMap<String, String, S> {
    fn cookie_value(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// A well-formed session read from cookies.
#[derive(Debug, Clone, PartialEq)]
pub struct CookieSession {
    pub user: SessionUser,
    pub token: String,
}

/// Result of looking for a session on a request.
#[derive(Debug)]
pub enum SessionLookup {
    /// One of the two cookies is missing or empty.
    Absent,
    /// Both cookies exist but the user record does not parse.
    Malformed(SessionParseError),
    Present(CookieSession),
}

impl SessionLookup {
    #[must_use]
    pub fn session(&self) -> Option<&CookieSession> {
        match self {
            Self::Present(session) => Some(session),
            Self::Absent | Self::Malformed(_) => None,
        }
    }

    #[must_use]
    pub fn into_session(self) -> Option<CookieSession> {
        match self {
            Self::Present(session) => Some(session),
            Self::Absent | Self::Malformed(_) => None,
        }
    }
}

/// Look up the session carried by `source`.
pub fn read_session(source: &impl SessionSource) -> SessionLookup {
    let raw_user = source.cookie_value(USER_KEY).filter(|v| !v.is_empty());
    let token = source.cookie_value(TOKEN_KEY).filter(|v| !v.is_empty());
    let (Some(raw_user), Some(token)) = (raw_user, token) else {
        return SessionLookup::Absent;
    };

    match parse_session_user(&decode_cookie_value(&raw_user)) {
        Ok(user) => SessionLookup::Present(CookieSession { user, token }),
        Err(e) => {
            tracing::warn!(error = %e, "malformed session cookie; treating request as unauthenticated");
            SessionLookup::Malformed(e)
        }
    }
}

/// Encode a user record for the `oskar_user` cookie.
#[must_use]
pub fn encode_user_cookie(user: &SessionUser) -> String {
    urlencoding::encode(&user.to_json()).into_owned()
}

/// Undo cookie percent-encoding. Raw JSON written by older clients passes
/// through unchanged, so a literal `%` inside a field is kept as typed.
fn decode_cookie_value(raw: &str) -> String {
    if raw.trim_start().starts_with('{') {
        return raw.to_owned();
    }
    match urlencoding::decode(raw) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_owned(),
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
