//! Concentrated-Liquidity State Types
//!
//! Each pool is priced over its active-range virtual reserves. A pair may
//! have one pool per fee tier.

use std::collections::HashMap;

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use waypoint_core::{Address, Amount, AssetId};

use crate::constants::FeeTier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClPool {
    pub address: Address,
    pub token0: AssetId,
    pub token1: AssetId,
    pub fee: FeeTier,
    /// Virtual reserve of token0 in the active range
    pub reserve0: Amount,
    /// Virtual reserve of token1 in the active range
    pub reserve1: Amount,
}

impl ClPool {
    pub fn new(
        address: Address,
        asset_a: AssetId,
        reserve_a: Amount,
        asset_b: AssetId,
        reserve_b: Amount,
        fee: FeeTier,
    ) -> Self {
        let ((token0, reserve0), (token1, reserve1)) = if asset_a <= asset_b {
            ((asset_a, reserve_a), (asset_b, reserve_b))
        } else {
            ((asset_b, reserve_b), (asset_a, reserve_a))
        };
        Self {
            address,
            token0,
            token1,
            fee,
            reserve0,
            reserve1,
        }
    }

    /// Active liquidity, `sqrt(reserve0 * reserve1)`
    pub fn liquidity(&self) -> Amount {
        (BigUint::from(self.reserve0) * BigUint::from(self.reserve1))
            .sqrt()
            .to_u128()
            .unwrap_or(Amount::MAX)
    }

    pub fn reserves_for(&self, asset_in: &AssetId) -> Option<(Amount, Amount)> {
        if asset_in == &self.token0 {
            Some((self.reserve0, self.reserve1))
        } else if asset_in == &self.token1 {
            Some((self.reserve1, self.reserve0))
        } else {
            None
        }
    }

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

type PoolKey = (AssetId, AssetId, FeeTier);

fn pool_key(a: &AssetId, b: &AssetId, fee: FeeTier) -> PoolKey {
    if a <= b {
        (a.clone(), b.clone(), fee)
    } else {
        (b.clone(), a.clone(), fee)
    }
}

/// Pools of one concentrated-liquidity venue, at most one per pair and tier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolBook {
    pools: HashMap<PoolKey, ClPool>,
}

impl PoolBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pool: ClPool) {
        let key = pool_key(&pool.token0, &pool.token1, pool.fee);
        self.pools.insert(key, pool);
    }

    pub fn get_pool(&self, a: &AssetId, b: &AssetId, fee: FeeTier) -> Option<&ClPool> {
        self.pools.get(&pool_key(a, b, fee))
    }

    pub fn get_pool_mut(&mut self, a: &AssetId, b: &AssetId, fee: FeeTier) -> Option<&mut ClPool> {
        self.pools.get_mut(&pool_key(a, b, fee))
    }

    /// Pools for a pair across every tier, lowest fee first.
    pub fn pools_for_pair(&self, a: &AssetId, b: &AssetId) -> Vec<&ClPool> {
        FeeTier::ALL
            .iter()
            .filter_map(|fee| self.get_pool(a, b, *fee))
            .collect()
    }

    pub fn pools(&self) -> impl Iterator<Item = &ClPool> {
        self.pools.values()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}
