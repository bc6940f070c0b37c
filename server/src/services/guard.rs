//! Role-based route authorization.
//!
//! DESIGN
//! ======
//! The guard is a pure function of `(protected table, path, session)`. It
//! never touches the request beyond its path and never produces any outcome
//! other than "pass through" or "redirect to `/`". The axum middleware in
//! `routes::guard` is only the glue that feeds it cookies.
//!
//! Protected areas are an explicit ordered table of `prefix -> role`. The
//! historical `/dashboard-<role>` convention is kept as a constructor that
//! derives the role from the prefix, so operators can list prefixes in config
//! while the guard itself only ever compares against a stored role.

use identity::{HOME_PATH, Role};

use super::session::CookieSession;

/// Marker every protected prefix starts with. The role follows it.
pub const DASHBOARD_MARKER: &str = "/dashboard-";

/// Protected areas in evaluation order.
pub const DEFAULT_PROTECTED_PREFIXES: [&str; 4] =
    ["/dashboard-admin", "/dashboard-agent", "/dashboard-vendeur", "/dashboard-utilisateur"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("protected prefix {0:?} does not start with `/dashboard-`")]
    MissingMarker(String),
    #[error("protected prefix {0:?} names no role")]
    EmptyRole(String),
}

// =============================================================================
// ROUTE TABLE
// =============================================================================

/// One protected area and the role allowed into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedRoute {
    pub prefix: String,
    pub role: Role,
}

impl ProtectedRoute {
    /// Derive the required role from a `/dashboard-<role>` prefix.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteTableError`] if the prefix lacks the marker or the
    /// segment after the marker is empty.
    pub fn from_prefix(prefix: &str) -> Result<Self, RouteTableError> {
        let rest = prefix
            .strip_prefix(DASHBOARD_MARKER)
            .ok_or_else(|| RouteTableError::MissingMarker(prefix.to_owned()))?;
        let role = rest.split('/').next().unwrap_or_default();
        if role.is_empty() {
            return Err(RouteTableError::EmptyRole(prefix.to_owned()));
        }
        Ok(Self { prefix: prefix.to_owned(), role: Role::new(role) })
    }
}

/// Ordered set of protected path prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedRoutes {
    routes: Vec<ProtectedRoute>,
}

impl ProtectedRoutes {
    #[must_use]
    pub fn new(routes: Vec<ProtectedRoute>) -> Self {
        Self { routes }
    }

    /// Build the table from `/dashboard-<role>` prefixes, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns the first [`RouteTableError`] encountered.
    pub fn from_prefixes<I, S>(prefixes: I) -> Result<Self, RouteTableError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let routes = prefixes
            .into_iter()
            .map(|prefix| ProtectedRoute::from_prefix(prefix.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { routes })
    }

    /// The first matching entry for `path`. Matching is a case-sensitive
    /// `starts_with`, not a segment or pattern match.
    #[must_use]
    pub fn matching(&self, path: &str) -> Option<&ProtectedRoute> {
        self.routes.iter().find(|route| path.starts_with(route.prefix.as_str()))
    }

    #[must_use]
    pub fn required_role(&self, path: &str) -> Option<&Role> {
        self.matching(path).map(|route| &route.role)
    }

    #[must_use]
    pub fn is_protected(&self, path: &str) -> bool {
        self.matching(path).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProtectedRoute> {
        self.routes.iter()
    }
}

impl Default for ProtectedRoutes {
    fn default() -> Self {
        let routes = DEFAULT_PROTECTED_PREFIXES
            .iter()
            .filter_map(|prefix| ProtectedRoute::from_prefix(prefix).ok())
            .collect();
        Self { routes }
    }
}

// =============================================================================
// DECISION
// =============================================================================

/// Outcome of evaluating one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Pass the request through untouched.
    Allow,
    /// Send the client to [`HOME_PATH`].
    RedirectHome,
}

/// Reduce a request path to the form the static file service resolves:
/// percent-decoded, with empty, `.` and `..` segments collapsed.
///
/// Returns `None` when the path does not decode to UTF-8.
#[must_use]
pub fn canonical_path(raw: &str) -> Option<String> {
    let decoded = urlencoding::decode(raw).ok()?;
    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    Some(format!("/{}", segments.join("/")))
}

/// Decide whether `path` may be served for `session`.
///
/// The path is canonicalized first, so encoded or doubled-slash spellings
/// of a protected prefix are matched like the plain one. A path that cannot
/// be canonicalized is denied. The home path is always allowed, including
/// for authenticated users. Unprotected paths are always allowed. A
/// protected path is allowed only when a session exists and its role equals
/// the path's required role.
#[must_use]
pub fn evaluate(routes: &ProtectedRoutes, path: &str, session: Option<&CookieSession>) -> GuardDecision {
    let Some(path) = canonical_path(path) else {
        return GuardDecision::RedirectHome;
    };
    if path == HOME_PATH {
        return GuardDecision::Allow;
    }

    let Some(required) = routes.required_role(&path) else {
        return GuardDecision::Allow;
    };

    match session {
        Some(session) if session.user.role == *required => GuardDecision::Allow,
        _ => GuardDecision::RedirectHome,
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
