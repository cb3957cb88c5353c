//! Market seed
//!
//! Loads the registry and the chain state the server starts from. A seed
//! lists tokens, adapters in quote order, bridge assets, the pools of each
//! venue, and participant balances.

use std::path::Path;

use anyhow::{bail, Context};
use concentrated::{ClPool, FeeTier};
use constant_product::Pair;
use serde::Deserialize;
use stable::{RegistryKind, StablePool};
use swap_router::{AdapterSpec, ChainState, Registry, VenueBook};
use tracing::{debug, info};
use waypoint_core::{Address, Amount, AppConfig, Asset, AssetId, Timestamp, VenueId};

/// Market bundled with the binary
pub const BUNDLED_MARKET: &str = include_str!("../config/market.json");

#[derive(Debug, Clone, Deserialize)]
pub struct TokenSeed {
    pub id: AssetId,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairSeed {
    pub address: Address,
    pub tokens: [AssetId; 2],
    pub reserves: [Amount; 2],
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConcentratedSeed {
    pub address: Address,
    pub tokens: [AssetId; 2],
    pub reserves: [Amount; 2],
    pub fee: FeeTier,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StableSeed {
    pub registry: RegistryKind,
    pub pool: StablePool,
}

/// Pools of one venue. Only the list matching the venue's kind may be set.
#[derive(Debug, Clone, Deserialize)]
pub struct BookSeed {
    pub venue: VenueId,
    #[serde(default)]
    pub pairs: Vec<PairSeed>,
    #[serde(default)]
    pub concentrated_pools: Vec<ConcentratedSeed>,
    #[serde(default)]
    pub stable_pools: Vec<StableSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceSeed {
    pub holder: Address,
    pub asset: AssetId,
    pub amount: Amount,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketSeed {
    pub owner: Address,
    /// Starting settlement clock; defaults to the wall clock
    #[serde(default)]
    pub block_timestamp: Option<Timestamp>,
    pub tokens: Vec<TokenSeed>,
    pub adapters: Vec<AdapterSpec>,
    #[serde(default)]
    pub bridge_assets: Vec<AssetId>,
    #[serde(default)]
    pub books: Vec<BookSeed>,
    #[serde(default)]
    pub balances: Vec<BalanceSeed>,
}

impl MarketSeed {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("malformed market seed")
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read market seed {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("parse {}", path.display()))
    }

    pub fn bundled() -> anyhow::Result<Self> {
        Self::parse(BUNDLED_MARKET)
    }

    /// Build the registry and chain state.
    pub fn build(self, config: &AppConfig, now: Timestamp) -> anyhow::Result<(Registry, ChainState)> {
        let owner = self.owner;
        let mut registry = Registry::new(owner.clone(), config.chain.wrapped_native.clone());
        for token in self.tokens {
            registry.register_token(&owner, Asset::new(token.id, token.symbol, token.decimals))?;
        }
        if registry.token(registry.wrapped_native()).is_none() {
            bail!("wrapped native {} is not a listed token", registry.wrapped_native());
        }
        registry.set_adapters(&owner, self.adapters)?;
        registry.set_bridge_assets(&owner, self.bridge_assets)?;

        let mut chain = ChainState::new(self.block_timestamp.unwrap_or(now));
        for adapter in registry.adapters() {
            chain.insert_book(adapter.id().clone(), VenueBook::empty(adapter.kind()));
        }

        for seed in self.books {
            let Some(book) = chain.books.get_mut(&seed.venue) else {
                bail!("pools listed for unregistered venue {}", seed.venue);
            };
            fill_book(book, seed)?;
        }

        for balance in self.balances {
            chain
                .ledger
                .credit(&balance.holder, &balance.asset, balance.amount)?;
        }

        info!(
            tokens = registry.tokens().len(),
            adapters = registry.adapters().len(),
            bridge_assets = registry.bridge_assets().len(),
            block_timestamp = chain.block_timestamp,
            "market loaded"
        );
        Ok((registry, chain))
    }
}

fn fill_book(book: &mut VenueBook, seed: BookSeed) -> anyhow::Result<()> {
    let kind = book.kind();
    let foreign = match book {
        VenueBook::ConstantProduct(_) => {
            !seed.concentrated_pools.is_empty() || !seed.stable_pools.is_empty()
        }
        VenueBook::Concentrated(_) => !seed.pairs.is_empty() || !seed.stable_pools.is_empty(),
        VenueBook::Stable(_) => !seed.pairs.is_empty() || !seed.concentrated_pools.is_empty(),
    };
    if foreign {
        bail!("venue {} is {} but lists pools of another kind", seed.venue, kind);
    }

    match book {
        VenueBook::ConstantProduct(pairs) => {
            for p in seed.pairs {
                let [a, b] = p.tokens;
                let [ra, rb] = p.reserves;
                pairs.insert(Pair::new(p.address, a, ra, b, rb));
            }
        }
        VenueBook::Concentrated(pools) => {
            for p in seed.concentrated_pools {
                let [a, b] = p.tokens;
                let [ra, rb] = p.reserves;
                pools.insert(ClPool::new(p.address, a, ra, b, rb, p.fee));
            }
        }
        VenueBook::Stable(pools) => {
            for p in seed.stable_pools {
                pools
                    .add_pool(p.registry, p.pool)
                    .with_context(|| format!("venue {}", seed.venue))?;
            }
        }
    }
    debug!(venue = %seed.venue, %kind, pools = book.pool_count(), "venue book seeded");
    Ok(())
}
