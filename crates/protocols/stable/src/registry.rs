//! Pool Registries
//!
//! The venue lists its pools in three registries. Lookups walk them in a
//! fixed order (stable, then factory, then crypto) and take the first pool
//! holding both assets, preferring its own coins over its underlying list.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use waypoint_core::{Address, AssetId};

use crate::state::{PoolKind, StableError, StablePool};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryKind {
    Stable,
    Factory,
    Crypto,
}

impl RegistryKind {
    /// Lookup order
    pub const ORDER: [RegistryKind; 3] = [Self::Stable, Self::Factory, Self::Crypto];

    /// Pool family a registry lists
    pub fn pool_kind(self) -> PoolKind {
        match self {
            Self::Stable => PoolKind::Plain,
            Self::Factory => PoolKind::Meta,
            Self::Crypto => PoolKind::Crypto,
        }
    }

    fn slot(self) -> usize {
        match self {
            Self::Stable => 0,
            Self::Factory => 1,
            Self::Crypto => 2,
        }
    }
}

/// Resolved routing metadata for one asset pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    pub pool: Address,
    pub is_crypto_pool: bool,
    pub i: usize,
    pub j: usize,
    /// Indices refer to the underlying list and the `_underlying` entry
    /// points apply
    pub is_underlying: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StableBook {
    pools: HashMap<Address, StablePool>,
    registries: [Vec<Address>; 3],
}

impl StableBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// List a pool in a registry. The pool's kind must match the registry.
    pub fn add_pool(&mut self, registry: RegistryKind, pool: StablePool) -> Result<(), StableError> {
        pool.validate()?;
        if pool.kind != registry.pool_kind() {
            return Err(StableError::InvalidPool {
                pool: pool.address.to_string(),
                reason: format!("{:?} pool cannot be listed in the {:?} registry", pool.kind, registry),
            });
        }
        if self.pools.contains_key(&pool.address) {
            return Err(StableError::DuplicatePool {
                pool: pool.address.to_string(),
            });
        }

        self.registries[registry.slot()].push(pool.address.clone());
        self.pools.insert(pool.address.clone(), pool);
        Ok(())
    }

    pub fn pool(&self, address: &Address) -> Option<&StablePool> {
        self.pools.get(address)
    }

    pub fn pool_mut(&mut self, address: &Address) -> Option<&mut StablePool> {
        self.pools.get_mut(address)
    }

    /// Pool addresses listed in one registry, in listing order.
    pub fn registry(&self, registry: RegistryKind) -> &[Address] {
        &self.registries[registry.slot()]
    }

    pub fn pools(&self) -> impl Iterator<Item = &StablePool> {
        self.pools.values()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// First pool in one registry trading `a` against `b`.
    pub fn find_pool_for_coins(
        &self,
        registry: RegistryKind,
        a: &AssetId,
        b: &AssetId,
    ) -> Option<PoolConfig> {
        self.registry(registry).iter().find_map(|address| {
            let pool = self.pools.get(address)?;
            pool_config(pool, a, b)
        })
    }

    /// Walk every registry in lookup order.
    pub fn locate(&self, a: &AssetId, b: &AssetId) -> Option<PoolConfig> {
        if a == b {
            return None;
        }
        RegistryKind::ORDER
            .iter()
            .find_map(|registry| self.find_pool_for_coins(*registry, a, b))
    }
}

fn pool_config(pool: &StablePool, a: &AssetId, b: &AssetId) -> Option<PoolConfig> {
    if let (Some(i), Some(j)) = (pool.coin_index(a), pool.coin_index(b)) {
        return Some(PoolConfig {
            pool: pool.address.clone(),
            is_crypto_pool: pool.is_crypto(),
            i,
            j,
            is_underlying: false,
        });
    }
    match (pool.underlying_index(a), pool.underlying_index(b)) {
        (Some(i), Some(j)) => Some(PoolConfig {
            pool: pool.address.clone(),
            is_crypto_pool: pool.is_crypto(),
            i,
            j,
            is_underlying: true,
        }),
        _ => None,
    }
}
