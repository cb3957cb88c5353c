//! Shared market fixture for router tests

use concentrated::{ClPool, FeeTier, PoolBook};
use constant_product::{Pair, PairBook};
use stable::{PoolCoin, PoolKind, RegistryKind, StableBook, StablePool};
use waypoint_core::{Address, Amount, Asset, AssetId, VenueId};

use crate::adapter::{AdapterSpec, VenueKind};
use crate::chain::{ChainState, VenueBook};
use crate::registry::Registry;

pub const E6: Amount = 1_000_000;
pub const E8: Amount = 100_000_000;
pub const E18: Amount = 1_000_000_000_000_000_000;

pub fn addr(byte: u8) -> Address {
    Address::from_bytes([byte; 20])
}

pub fn asset(byte: u8) -> AssetId {
    AssetId::from_bytes([byte; 20])
}

pub fn owner() -> Address {
    addr(0x01)
}

pub fn trader() -> Address {
    addr(0x10)
}

pub fn weth() -> AssetId {
    asset(0xc0)
}
pub fn usdc() -> AssetId {
    asset(0x0c)
}
pub fn dai() -> AssetId {
    asset(0x0d)
}
pub fn usdt() -> AssetId {
    asset(0x07)
}
pub fn wbtc() -> AssetId {
    asset(0x0b)
}
pub fn steth() -> AssetId {
    asset(0x5e)
}
/// Only trades against `orphan_pair()`, which no bridge asset reaches
pub fn lone() -> AssetId {
    asset(0x99)
}
pub fn orphan_pair() -> AssetId {
    asset(0x98)
}

pub fn make_pair(pool: u8, a: AssetId, ra: Amount, b: AssetId, rb: Amount) -> Pair {
    Pair::new(addr(pool), a, ra, b, rb)
}

fn stable_coin(asset: AssetId, decimals: u8, balance: Amount) -> PoolCoin {
    PoolCoin {
        asset,
        decimals,
        balance,
    }
}

pub fn make_registry() -> Registry {
    let mut registry = Registry::new(owner(), weth());
    let tokens = [
        Asset::native("ETH", 18),
        Asset::new(weth(), "WETH", 18),
        Asset::new(usdc(), "USDC", 6),
        Asset::new(dai(), "DAI", 18),
        Asset::new(usdt(), "USDT", 6),
        Asset::new(wbtc(), "WBTC", 8),
        Asset::new(steth(), "STETH", 18),
        Asset::new(lone(), "LONE", 18),
        Asset::new(orphan_pair(), "ORPH", 18),
    ];
    for token in tokens {
        registry
            .register_token(&owner(), token)
            .expect("owner registers tokens");
    }

    registry
        .set_adapters(
            &owner(),
            vec![
                AdapterSpec {
                    id: VenueId::new("UNI-V3"),
                    kind: VenueKind::ConcentratedLiquidity,
                    address: addr(0xa3),
                },
                AdapterSpec {
                    id: VenueId::new("UNI-V2"),
                    kind: VenueKind::ConstantProduct,
                    address: addr(0xa1),
                },
                AdapterSpec {
                    id: VenueId::new("SUSHI"),
                    kind: VenueKind::ConstantProduct,
                    address: addr(0xa2),
                },
                AdapterSpec {
                    id: VenueId::new("CURVE"),
                    kind: VenueKind::StableInvariant,
                    address: addr(0xa5),
                },
            ],
        )
        .expect("owner sets adapters");

    registry
        .set_bridge_assets(&owner(), vec![AssetId::native(), weth(), usdc(), dai()])
        .expect("bridge assets are registered");
    registry
}

pub fn make_chain() -> ChainState {
    let mut chain = ChainState::new(1_700_000_000);

    let mut v2 = PairBook::new();
    v2.insert(make_pair(0xb1, weth(), 1_000 * E18, usdc(), 2_000_000 * E6));
    v2.insert(make_pair(0xb2, usdc(), 5_000_000 * E6, dai(), 5_000_000 * E18));
    v2.insert(make_pair(0xb3, weth(), 1_500 * E18, wbtc(), 100 * E8));
    v2.insert(make_pair(0xb4, lone(), 1_000 * E18, orphan_pair(), 1_000 * E18));
    chain.insert_book(VenueId::new("UNI-V2"), VenueBook::ConstantProduct(v2));

    let mut sushi = PairBook::new();
    sushi.insert(make_pair(0xc1, weth(), 500 * E18, usdc(), 1_010_000 * E6));
    sushi.insert(make_pair(0xc2, wbtc(), 50 * E8, usdc(), 1_500_000 * E6));
    chain.insert_book(VenueId::new("SUSHI"), VenueBook::ConstantProduct(sushi));

    let mut v3 = PoolBook::new();
    v3.insert(ClPool::new(
        addr(0xd1),
        weth(),
        2_000 * E18,
        usdc(),
        3_990_000 * E6,
        FeeTier::Low,
    ));
    chain.insert_book(VenueId::new("UNI-V3"), VenueBook::Concentrated(v3));

    let mut curve = StableBook::new();
    curve
        .add_pool(
            RegistryKind::Stable,
            StablePool {
                address: addr(0xe1),
                kind: PoolKind::Plain,
                amplification: 2_000,
                fee: 1_000_000,
                coins: vec![
                    stable_coin(dai(), 18, 10_000_000 * E18),
                    stable_coin(usdc(), 6, 10_000_000 * E6),
                    stable_coin(usdt(), 6, 10_000_000 * E6),
                ],
                underlying: vec![],
            },
        )
        .expect("valid 3pool");
    curve
        .add_pool(
            RegistryKind::Stable,
            StablePool {
                address: addr(0xe2),
                kind: PoolKind::Plain,
                amplification: 50,
                fee: 4_000_000,
                coins: vec![
                    stable_coin(weth(), 18, 10_000 * E18),
                    stable_coin(steth(), 18, 10_000 * E18),
                ],
                underlying: vec![],
            },
        )
        .expect("valid eth pool");
    chain.insert_book(VenueId::new("CURVE"), VenueBook::Stable(curve));

    let funds = [
        (AssetId::native(), 100 * E18),
        (weth(), 100 * E18),
        (usdc(), 1_000_000 * E6),
        (wbtc(), 10 * E8),
        (steth(), 50 * E18),
    ];
    for (asset, amount) in funds {
        chain
            .ledger
            .credit(&trader(), &asset, amount)
            .expect("fund trader");
    }
    chain
}
