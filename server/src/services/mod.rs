//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own decision logic and backend access so route handlers
//! and middleware can stay focused on protocol translation and cookies.

pub mod backend;
pub mod guard;
pub mod session;
