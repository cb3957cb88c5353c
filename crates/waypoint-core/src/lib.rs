//! Waypoint-core: Shared types, errors, ledger, and configuration
//!
//! This crate provides the foundational types used across the Waypoint workspace.

pub mod config;
pub mod custody;
pub mod errors;
pub mod ledger;
pub mod types;

pub use config::*;
pub use custody::{settle_hop, HopLeg};
pub use errors::*;
pub use ledger::Ledger;
pub use types::*;
