//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by headers, client-side route guards and user-aware components to
//! coordinate login redirects and identity-dependent rendering.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use identity::SessionUser;

/// Authentication state tracking the current user and loading status.
///
/// Starts in `loading` and moves to authenticated or unauthenticated after
/// the first storage read. It never returns to `loading`.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<SessionUser>,
    pub loading: bool,
}

impl AuthState {
    #[must_use]
    pub fn loading() -> Self {
        Self { is_authenticated: false, user: None, loading: true }
    }

    #[must_use]
    pub fn authenticated(user: SessionUser) -> Self {
        Self { is_authenticated: true, user: Some(user), loading: false }
    }

    #[must_use]
    pub fn unauthenticated() -> Self {
        Self { is_authenticated: false, user: None, loading: false }
    }

    /// Role discriminator of the current user, if any.
    pub fn role(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.role.as_str())
    }
}

impl Default for AuthState {
    fn default() -> Self {
        Self::loading()
    }
}
