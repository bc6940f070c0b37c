//! Auth broadcast bus.
//!
//! DESIGN
//! ======
//! Three signals mean "session storage may have changed": the app's
//! `authStateChanged` event (same tab, after login/logout), its
//! `forceHeaderUpdate` event, and the browser's native `storage` event
//! (other tabs only; it never fires in the tab that wrote).
//! None carries a payload. Subscribers get a [`Subscription`] handle and are
//! removed when it drops, so a torn-down consumer cannot leak a listener.
//!
//! The bus is single-threaded (`Rc`), matching the browser event loop. Each
//! notification runs every subscriber to completion before returning.
//!
//! A bus is "bridged" while window listeners forward DOM events into it.
//! Announcers then fire the DOM event instead of notifying directly, so each
//! subscriber still hears a change exactly once.

#[cfg(test)]
#[path = "auth_events_test.rs"]
mod auth_events_test;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use identity::{AUTH_STATE_CHANGED_EVENT, FORCE_HEADER_UPDATE_EVENT};

/// Native cross-tab storage event name.
pub const STORAGE_EVENT: &str = "storage";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthSignal {
    AuthStateChanged,
    ForceHeaderUpdate,
    StorageChanged,
}

impl AuthSignal {
    pub const ALL: [Self; 3] = [Self::AuthStateChanged, Self::ForceHeaderUpdate, Self::StorageChanged];

    /// DOM event name this signal is bridged from.
    #[must_use]
    pub fn event_name(self) -> &'static str {
        match self {
            Self::AuthStateChanged => AUTH_STATE_CHANGED_EVENT,
            Self::ForceHeaderUpdate => FORCE_HEADER_UPDATE_EVENT,
            Self::StorageChanged => STORAGE_EVENT,
        }
    }
}

type Listener = Rc<dyn Fn(AuthSignal)>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
    bridged: bool,
}

/// Publish/subscribe hub for [`AuthSignal`]s. Clones share one registry.
#[derive(Clone, Default)]
pub struct AuthEvents {
    registry: Rc<RefCell<Registry>>,
}

impl AuthEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for every signal until the returned handle drops.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(AuthSignal) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Rc::new(listener)));
        Subscription { registry: Rc::downgrade(&self.registry), id }
    }

    /// Deliver `signal` to every current subscriber.
    ///
    /// Listeners are snapshotted first, so a listener may subscribe or
    /// unsubscribe while being notified. Changes apply from the next signal.
    pub fn notify(&self, signal: AuthSignal) {
        let listeners: Vec<Listener> = self.registry.borrow().listeners.iter().map(|(_, l)| Rc::clone(l)).collect();
        log::debug!("auth signal {signal:?} -> {} listener(s)", listeners.len());
        for listener in listeners {
            listener(signal);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }

    /// Whether window events are currently forwarded into this bus.
    pub fn is_bridged(&self) -> bool {
        self.registry.borrow().bridged
    }

    pub(crate) fn set_bridged(&self, bridged: bool) {
        self.registry.borrow_mut().bridged = bridged;
    }
}

impl fmt::Debug for AuthEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthEvents")
            .field("listeners", &self.listener_count())
            .field("bridged", &self.is_bridged())
            .finish()
    }
}

/// Live registration on an [`AuthEvents`] bus. Unsubscribes on drop.
#[derive(Debug)]
pub struct Subscription {
    registry: Weak<RefCell<Registry>>,
    id: u64,
}

impl Subscription {
    /// Unsubscribe now. Same as dropping the handle.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
        }
    }
}
