//! Concentrated-Liquidity Constants

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fees are expressed in hundredths of a basis point
pub const FEE_DENOMINATOR: u32 = 1_000_000;

/// Discrete fee tiers a pool can be deployed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FeeTier {
    /// 0.01%
    Lowest,
    /// 0.05%
    Low,
    /// 0.3%
    Medium,
    /// 1%
    High,
}

impl FeeTier {
    /// All tiers, lowest fee first
    pub const ALL: [FeeTier; 4] = [Self::Lowest, Self::Low, Self::Medium, Self::High];

    pub fn amount(self) -> u32 {
        match self {
            Self::Lowest => 100,
            Self::Low => 500,
            Self::Medium => 3_000,
            Self::High => 10_000,
        }
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.amount() == value)
            .ok_or_else(|| format!("unsupported fee tier {}", value))
    }
}

impl From<FeeTier> for u32 {
    fn from(value: FeeTier) -> Self {
        value.amount()
    }
}

impl fmt::Display for FeeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.amount())
    }
}

/// Fee amounts of every supported tier, lowest first.
pub fn fee_amounts() -> Vec<u32> {
    FeeTier::ALL.iter().map(|tier| tier.amount()).collect()
}
