//! Stable Invariant Constants

/// Fees are expressed over 1e10
pub const FEE_DENOMINATOR: u64 = 10_000_000_000;

/// Balances are normalized to 18 decimals before invariant math
pub const PRECISION_DECIMALS: u8 = 18;

/// Redemption rates of underlying coins are scaled by 1e18
pub const RATE_PRECISION: u128 = 1_000_000_000_000_000_000;

/// Largest coin count a pool may hold
pub const MAX_COINS: usize = 8;

/// Newton iteration cap for the invariant solvers
pub const MAX_ITERATIONS: usize = 255;
