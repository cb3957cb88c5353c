//! Constant-Product State Types
//!
//! Pair reserves as last observed for one constant-product venue.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use std::fmt;
use waypoint_core::{Address, Amount, AssetId};

use crate::calculator::sort_assets;

/// A constant-product pair. `token0 < token1` under canonical ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    /// Pair contract address
    pub address: Address,
    pub token0: AssetId,
    pub token1: AssetId,
    pub reserve0: Amount,
    pub reserve1: Amount,
}

impl Pair {
    /// Build a pair from reserves given in any order.
    pub fn new(
        address: Address,
        asset_a: AssetId,
        reserve_a: Amount,
        asset_b: AssetId,
        reserve_b: Amount,
    ) -> Self {
        if asset_a <= asset_b {
            Self {
                address,
                token0: asset_a,
                token1: asset_b,
                reserve0: reserve_a,
                reserve1: reserve_b,
            }
        } else {
            Self {
                address,
                token0: asset_b,
                token1: asset_a,
                reserve0: reserve_b,
                reserve1: reserve_a,
            }
        }
    }

    /// `(reserve_in, reserve_out)` for a swap that sells `asset_in`.
    ///
    /// Which reserve is which follows the canonical asset order, never the
    /// order the caller named the assets in.
    pub fn reserves_for(&self, asset_in: &AssetId) -> Option<(Amount, Amount)> {
        if asset_in == &self.token0 {
            Some((self.reserve0, self.reserve1))
        } else if asset_in == &self.token1 {
            Some((self.reserve1, self.reserve0))
        } else {
            None
        }
    }

    /// Book a settled swap against the reserves.
    pub fn apply_swap(&mut self, asset_in: &AssetId, amount_in: Amount, amount_out: Amount) {
        if asset_in == &self.token0 {
            self.reserve0 = self.reserve0.saturating_add(amount_in);
            self.reserve1 = self.reserve1.saturating_sub(amount_out);
        } else {
            self.reserve1 = self.reserve1.saturating_add(amount_in);
            self.reserve0 = self.reserve0.saturating_sub(amount_out);
        }
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pair {} | {}: {} | {}: {}",
            self.address, self.token0, self.reserve0, self.token1, self.reserve1
        )
    }
}

/// All pairs of one constant-product venue, keyed by sorted asset pair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairBook {
    pairs: HashMap<(AssetId, AssetId), Pair>,
}

impl PairBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the pair for its asset pair.
    pub fn insert(&mut self, pair: Pair) {
        self.pairs
            .insert((pair.token0.clone(), pair.token1.clone()), pair);
    }

    pub fn get_pair(&self, a: &AssetId, b: &AssetId) -> Option<&Pair> {
        let (token0, token1) = sort_assets(a, b);
        self.pairs.get(&(token0.clone(), token1.clone()))
    }

    pub fn get_pair_mut(&mut self, a: &AssetId, b: &AssetId) -> Option<&mut Pair> {
        let (token0, token1) = sort_assets(a, b);
        self.pairs.get_mut(&(token0.clone(), token1.clone()))
    }

    pub fn pairs(&self) -> impl Iterator<Item = &Pair> {
        self.pairs.values()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
