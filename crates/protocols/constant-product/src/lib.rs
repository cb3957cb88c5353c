//! Constant-Product Venue
//!
//! x * y = k pairs with a 0.3% fee baked into the integer output formula.
//! Pairs are keyed by their canonically sorted assets, so reserve lookup never
//! depends on the order a caller names the assets in.

pub mod adapter;
pub mod calculator;
pub mod constants;
pub mod state;

// Re-exports
pub use adapter::ConstantProductAdapter;
pub use calculator::{calculate_input, calculate_output, get_amount_in, get_amount_out};
pub use constants::fees;
pub use state::{Pair, PairBook};
