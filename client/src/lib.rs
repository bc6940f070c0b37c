//! Browser-side session state for the marketplace dashboards.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server-side route guard decides which dashboard a navigation may reach.
//! This crate keeps already-loaded pages in agreement with it: headers, menus
//! and client-side redirects read their auth state from a [`SessionObserver`],
//! which re-reads `localStorage` whenever the login flow, another component,
//! or another tab signals a change.
//!
//! Browser bindings (`localStorage`, window events, `fetch`) live behind the
//! `hydrate` feature. Without it everything runs against in-memory storage,
//! which is what the tests and server-side rendering use. In the browser,
//! [`start`] is the entry point.

pub mod net;
#[cfg(feature = "hydrate")]
pub mod runtime;
pub mod state;
pub mod util;

#[cfg(feature = "hydrate")]
pub use runtime::{SessionRuntime, start};
pub use state::auth::AuthState;
pub use util::auth::SessionObserver;
pub use util::auth_events::{AuthEvents, AuthSignal, Subscription};
pub use util::storage::{MemoryStorage, SessionStorage};

/// Route `log` output to the browser console and install the panic hook.
///
/// No-op outside the browser.
pub fn init_logging() {
    #[cfg(feature = "hydrate")]
    {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    }
}
