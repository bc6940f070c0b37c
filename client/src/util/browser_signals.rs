//! Bridge from window events to the auth bus. Requires a browser environment.
//!
//! Installs one listener per [`AuthSignal`] on `window` and forwards each
//! event into an [`AuthEvents`] bus. Listeners are removed when the
//! [`BrowserSignals`] value drops. While both app events are bridged the bus
//! is marked bridged, and `persist_session`/`clear_session` announce through
//! [`dispatch`] instead of notifying the bus directly.

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

use super::auth_events::{AuthEvents, AuthSignal};

type EventClosure = Closure<dyn FnMut(web_sys::Event)>;

pub struct BrowserSignals {
    window: web_sys::Window,
    events: AuthEvents,
    listeners: Vec<(AuthSignal, EventClosure)>,
}

impl BrowserSignals {
    /// Start forwarding window events into `events`.
    ///
    /// Returns `None` outside a window context.
    pub fn install(events: &AuthEvents) -> Option<Self> {
        let window = web_sys::window()?;
        let mut listeners = Vec::with_capacity(AuthSignal::ALL.len());

        for signal in AuthSignal::ALL {
            let bus = events.clone();
            let closure = EventClosure::new(move |_event: web_sys::Event| bus.notify(signal));
            let added = window.add_event_listener_with_callback(signal.event_name(), closure.as_ref().unchecked_ref());
            if added.is_err() {
                log::warn!("could not listen for {} events", signal.event_name());
                continue;
            }
            listeners.push((signal, closure));
        }

        let app_events_bridged = [AuthSignal::AuthStateChanged, AuthSignal::ForceHeaderUpdate]
            .iter()
            .all(|wanted| listeners.iter().any(|(signal, _)| signal == wanted));
        events.set_bridged(app_events_bridged);

        Some(Self { window, events: events.clone(), listeners })
    }
}

impl Drop for BrowserSignals {
    fn drop(&mut self) {
        self.events.set_bridged(false);
        for (signal, closure) in self.listeners.drain(..) {
            let _ = self
                .window
                .remove_event_listener_with_callback(signal.event_name(), closure.as_ref().unchecked_ref());
        }
    }
}

/// Fire an app-defined signal as a window `CustomEvent`. Bridged buses and
/// listeners outside this crate both hear it. The native `storage` event
/// cannot be dispatched.
pub fn dispatch(signal: AuthSignal) {
    if signal == AuthSignal::StorageChanged {
        return;
    }
    let Some(window) = web_sys::window() else {
        return;
    };
    match web_sys::CustomEvent::new(signal.event_name()) {
        Ok(event) => {
            let _ = window.dispatch_event(&event);
        }
        Err(_) => log::warn!("could not create {} event", signal.event_name()),
    }
}
