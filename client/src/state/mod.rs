//! Client state containers.

pub mod auth;
