//! Stable Pool State Types

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use waypoint_core::{Address, Amount, AssetId};

use crate::constants::{MAX_COINS, PRECISION_DECIMALS, RATE_PRECISION};
use crate::math::{apply_fee, crypto_dy, stable_dy, to_amount};

/// Errors raised while assembling a stable venue book
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StableError {
    #[error("Invalid pool {pool}: {reason}")]
    InvalidPool { pool: String, reason: String },

    #[error("Pool {pool} registered twice")]
    DuplicatePool { pool: String },
}

/// Pool family, fixed by the registry a pool is listed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    /// StableSwap pool from the main registry
    Plain,
    /// StableSwap pool deployed by the factory
    Meta,
    /// Volatile-pair pool priced by the constant-product rule
    Crypto,
}

/// A coin the pool holds directly
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolCoin {
    pub asset: AssetId,
    pub decimals: u8,
    pub balance: Amount,
}

/// Underlying asset redeemable from the coin at the same index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnderlyingCoin {
    pub asset: AssetId,
    /// Underlying units per coin unit, scaled by 1e18
    pub rate: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StablePool {
    pub address: Address,
    pub kind: PoolKind,
    /// Amplification coefficient (ignored by crypto pools)
    #[serde(default)]
    pub amplification: u64,
    /// Swap fee over 1e10
    pub fee: u64,
    pub coins: Vec<PoolCoin>,
    #[serde(default)]
    pub underlying: Vec<UnderlyingCoin>,
}

impl StablePool {
    pub fn validate(&self) -> Result<(), StableError> {
        let invalid = |reason: &str| StableError::InvalidPool {
            pool: self.address.to_string(),
            reason: reason.to_string(),
        };

        if self.coins.len() < 2 || self.coins.len() > MAX_COINS {
            return Err(invalid("coin count outside 2..=8"));
        }
        if self.coins.iter().any(|c| c.decimals > PRECISION_DECIMALS) {
            return Err(invalid("coin decimals above 18"));
        }
        if self.kind != PoolKind::Crypto && self.amplification == 0 {
            return Err(invalid("amplification must be positive"));
        }
        if !self.underlying.is_empty() && self.underlying.len() != self.coins.len() {
            return Err(invalid("underlying list must align with coins"));
        }
        if self.underlying.iter().any(|u| u.rate == 0) {
            return Err(invalid("underlying rate must be positive"));
        }
        if u128::from(self.fee) >= u128::from(crate::constants::FEE_DENOMINATOR) {
            return Err(invalid("fee must be below 100%"));
        }
        Ok(())
    }

    pub fn coin_index(&self, asset: &AssetId) -> Option<usize> {
        self.coins.iter().position(|c| &c.asset == asset)
    }

    pub fn underlying_index(&self, asset: &AssetId) -> Option<usize> {
        self.underlying.iter().position(|u| &u.asset == asset)
    }

    pub fn is_crypto(&self) -> bool {
        self.kind == PoolKind::Crypto
    }

    fn multiplier(&self, index: usize) -> BigUint {
        BigUint::from(10u8).pow(u32::from(PRECISION_DECIMALS - self.coins[index].decimals))
    }

    fn normalized_balances(&self) -> Vec<BigUint> {
        (0..self.coins.len())
            .map(|k| BigUint::from(self.coins[k].balance) * self.multiplier(k))
            .collect()
    }

    /// Output of coin `j` for `dx` of coin `i`, after the fee.
    pub fn get_dy(&self, i: usize, j: usize, dx: Amount) -> Option<Amount> {
        let coins = self.coins.len();
        if i == j || i >= coins || j >= coins {
            return None;
        }

        let xp = self.normalized_balances();
        let dx_norm = BigUint::from(dx) * self.multiplier(i);
        let dy_norm = if self.is_crypto() {
            crypto_dy(i, j, &dx_norm, &xp)?
        } else {
            stable_dy(i, j, &dx_norm, &xp, self.amplification)?
        };
        let dy = dy_norm / self.multiplier(j);
        to_amount(apply_fee(&dy, self.fee))
    }

    /// Output of underlying `j` for `dx` of underlying `i`, after the fee.
    ///
    /// Underlying amounts are converted to coin units at the coin's rate,
    /// swapped, and the output redeemed back to underlying.
    pub fn get_dy_underlying(&self, i: usize, j: usize, dx: Amount) -> Option<Amount> {
        self.underlying_swap(i, j, dx).map(|(_, _, dy)| dy)
    }

    /// `(dx_coin, dy_coin, dy)` of an underlying swap. The pool books the
    /// coin amounts; the caller receives `dy`.
    fn underlying_swap(&self, i: usize, j: usize, dx: Amount) -> Option<(Amount, Amount, Amount)> {
        let (rate_i, rate_j) = (self.underlying.get(i)?.rate, self.underlying.get(j)?.rate);
        let dx_coin = to_amount(BigUint::from(dx) * BigUint::from(RATE_PRECISION) / BigUint::from(rate_i))?;
        let dy_coin = self.get_dy(i, j, dx_coin)?;
        let dy = to_amount(BigUint::from(dy_coin) * BigUint::from(rate_j) / BigUint::from(RATE_PRECISION))?;
        Some((dx_coin, dy_coin, dy))
    }

    /// Swap coins against the pool and book the new balances.
    pub fn exchange(&mut self, i: usize, j: usize, dx: Amount) -> Option<Amount> {
        let dy = self.get_dy(i, j, dx)?;
        self.book(i, j, dx, dy);
        Some(dy)
    }

    /// Swap underlying assets against the pool and book the new balances.
    pub fn exchange_underlying(&mut self, i: usize, j: usize, dx: Amount) -> Option<Amount> {
        let (dx_coin, dy_coin, dy) = self.underlying_swap(i, j, dx)?;
        self.book(i, j, dx_coin, dy_coin);
        Some(dy)
    }

    fn book(&mut self, i: usize, j: usize, dx: Amount, dy: Amount) {
        self.coins[i].balance = self.coins[i].balance.saturating_add(dx);
        self.coins[j].balance = self.coins[j].balance.saturating_sub(dy);
    }
}

impl fmt::Display for StablePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coins: Vec<&str> = self.coins.iter().map(|c| c.asset.as_str()).collect();
        write!(f, "{:?} pool {} [{}]", self.kind, self.address, coins.join(", "))
    }
}
