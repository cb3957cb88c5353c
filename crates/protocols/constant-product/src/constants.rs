//! Constant-Product Constants
//!
//! Fee parameters shared by every x * y = k pair.

/// Fee constants
pub mod fees {
    /// Fee numerator (0.3% fee = 997/1000)
    pub const FEE_NUM: u32 = 997;

    /// Fee denominator
    pub const FEE_DENOM: u32 = 1000;
}
