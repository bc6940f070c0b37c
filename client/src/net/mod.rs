//! Network calls to the HTTP edge.

pub mod api;
