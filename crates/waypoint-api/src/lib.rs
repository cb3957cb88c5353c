//! waypoint-api: HTTP API layer for Waypoint
//!
//! Exposes route search, swap execution, and registry administration over
//! JSON.

pub mod dto;
pub mod routes;
pub mod server;
pub mod state;

pub use server::*;
pub use state::AppState;
