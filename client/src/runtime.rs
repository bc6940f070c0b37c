//! Browser entry point. Requires a browser environment.
//!
//! [`start`] wires one shared [`AuthEvents`] bus to `localStorage` and to the
//! window's `authStateChanged`, `forceHeaderUpdate` and `storage` events.
//! Consumers mount observers through [`SessionRuntime::observe`]. Dropping the
//! runtime removes the window listeners.

use std::rc::Rc;

use crate::util::auth::SessionObserver;
use crate::util::auth_events::AuthEvents;
use crate::util::browser_signals::BrowserSignals;
use crate::util::storage::BrowserStorage;

pub struct SessionRuntime {
    events: AuthEvents,
    storage: Rc<BrowserStorage>,
    _signals: BrowserSignals,
}

impl SessionRuntime {
    pub fn events(&self) -> &AuthEvents {
        &self.events
    }

    pub fn storage(&self) -> Rc<BrowserStorage> {
        Rc::clone(&self.storage)
    }

    /// Observer reading `localStorage` and re-checking on every window signal.
    pub fn observe(&self) -> SessionObserver<BrowserStorage> {
        SessionObserver::attach(self.storage(), &self.events)
    }
}

/// Initialize logging and bridge window events into a fresh bus.
///
/// Returns `None` outside a window context or when `localStorage` is
/// unavailable.
pub fn start() -> Option<SessionRuntime> {
    crate::init_logging();
    let Some(storage) = BrowserStorage::local() else {
        log::warn!("localStorage unavailable, session observer disabled");
        return None;
    };
    let events = AuthEvents::new();
    let signals = BrowserSignals::install(&events)?;
    log::info!("session runtime started, bridged={}", events.is_bridged());
    Some(SessionRuntime { events, storage: Rc::new(storage), _signals: signals })
}
