//! Session observer and shared auth helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every header, menu or page that renders differently for signed-in users
//! owns its own [`SessionObserver`]. Observers hold no shared cache: each one
//! re-reads storage on every signal, so two observers never disagree for
//! longer than one event dispatch.
//!
//! ERROR HANDLING
//! ==============
//! Storage content is written by other code and other tabs. A token without a
//! user, a user without a token, or a user record that does not parse all
//! resolve to "unauthenticated"; nothing here panics or returns an error.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::cell::RefCell;
use std::rc::Rc;

use identity::{LEGACY_TOKEN_KEY, SessionUser, TOKEN_KEY, USER_KEY, parse_session_user};

use super::auth_events::{AuthEvents, AuthSignal, Subscription};
use super::storage::SessionStorage;
use crate::state::auth::AuthState;

/// A session as persisted in storage.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredSession {
    pub user: SessionUser,
    pub token: String,
}

/// Read the persisted session. The token is looked up under `oskar_token`
/// first, then the legacy `token` key.
pub fn read_stored_session<S: SessionStorage + ?Sized>(storage: &S) -> Option<StoredSession> {
    let token = storage
        .get_item(TOKEN_KEY)
        .filter(|t| !t.is_empty())
        .or_else(|| storage.get_item(LEGACY_TOKEN_KEY).filter(|t| !t.is_empty()))?;
    let raw_user = storage.get_item(USER_KEY).filter(|u| !u.is_empty())?;

    match parse_session_user(&raw_user) {
        Ok(user) => Some(StoredSession { user, token }),
        Err(e) => {
            log::warn!("ignoring stored session: {e}");
            None
        }
    }
}

/// Store a freshly issued session and tell every observer about it.
pub fn persist_session<S: SessionStorage + ?Sized>(storage: &S, events: &AuthEvents, user: &SessionUser, token: &str) {
    storage.set_item(TOKEN_KEY, token);
    storage.set_item(USER_KEY, &user.to_json());
    broadcast_change(events);
}

/// Remove every session key, including the legacy token, and notify.
pub fn clear_session<S: SessionStorage + ?Sized>(storage: &S, events: &AuthEvents) {
    for key in [TOKEN_KEY, LEGACY_TOKEN_KEY, USER_KEY] {
        storage.remove_item(key);
    }
    broadcast_change(events);
}

fn broadcast_change(events: &AuthEvents) {
    announce(events, AuthSignal::AuthStateChanged);
    announce(events, AuthSignal::ForceHeaderUpdate);
}

/// Fire `signal` on `window` when the bus hears window events, else notify
/// the bus directly.
fn announce(events: &AuthEvents, signal: AuthSignal) {
    #[cfg(feature = "hydrate")]
    if events.is_bridged() {
        super::browser_signals::dispatch(signal);
        return;
    }
    events.notify(signal);
}

/// Client-side redirect rule: leave once auth has loaded and nobody is signed in.
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.loading && state.user.is_none()
}

// =============================================================================
// OBSERVER
// =============================================================================

/// Per-consumer view of the persisted session.
///
/// Created in `loading`. [`SessionObserver::attach`] performs the first read
/// and then re-reads on every [`AuthSignal`]. Dropping the observer drops its
/// subscription.
pub struct SessionObserver<S: SessionStorage + 'static> {
    storage: Rc<S>,
    state: Rc<RefCell<AuthState>>,
    subscription: Option<Subscription>,
}

impl<S: SessionStorage + 'static> SessionObserver<S> {
    /// Observer that has not read storage yet and listens to nothing.
    pub fn new(storage: Rc<S>) -> Self {
        Self { storage, state: Rc::new(RefCell::new(AuthState::loading())), subscription: None }
    }

    /// Read storage once, then stay current with every signal on `events`.
    pub fn attach(storage: Rc<S>, events: &AuthEvents) -> Self {
        let mut observer = Self::new(storage);
        observer.check_auth();

        let storage = Rc::clone(&observer.storage);
        let state = Rc::clone(&observer.state);
        observer.subscription = Some(events.subscribe(move |signal| {
            let authenticated = refresh(&*storage, &state);
            log::debug!("session re-checked after {signal:?}: authenticated={authenticated}");
        }));
        observer
    }

    /// Re-read storage and update state. Returns whether a session was found.
    pub fn check_auth(&self) -> bool {
        refresh(&*self.storage, &self.state)
    }

    /// Stop reacting to signals. The last state is kept.
    pub fn detach(&mut self) {
        self.subscription = None;
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.state.borrow().user.clone()
    }

    pub fn loading(&self) -> bool {
        self.state.borrow().loading
    }
}

fn refresh<S: SessionStorage + ?Sized>(storage: &S, state: &RefCell<AuthState>) -> bool {
    let next = match read_stored_session(storage) {
        Some(session) => AuthState::authenticated(session.user),
        None => AuthState::unauthenticated(),
    };
    let authenticated = next.is_authenticated;
    *state.borrow_mut() = next;
    authenticated
}
