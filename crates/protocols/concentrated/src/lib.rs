//! Concentrated-Liquidity Venue
//!
//! Pools deployed at discrete fee tiers. A pair can have one pool per tier;
//! the adapter resolves which one to trade against before quoting.

pub mod adapter;
pub mod constants;
pub mod quoter;
pub mod state;

// Re-exports
pub use adapter::ConcentratedAdapter;
pub use constants::{fee_amounts, FeeTier, FEE_DENOMINATOR};
pub use quoter::{calculate_output, quote_exact_input_single, resolve_fee_tier};
pub use state::{ClPool, PoolBook};
