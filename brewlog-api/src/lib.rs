//! Brewlog HTTP API library
//!
//! Exposes the router and application context so integration tests can
//! drive the API without binding a socket.

pub mod api;
pub mod services;

pub use api::server::{build_router, AppContext};
