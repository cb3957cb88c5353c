//! Venue Adapters
//!
//! The closed set of venue kinds behind one quote/execute capability. Each
//! adapter trades against the book stored under its own id in the chain
//! state.

use concentrated::{ConcentratedAdapter, FeeTier};
use constant_product::ConstantProductAdapter;
use serde::{Deserialize, Serialize};
use stable::{PoolConfig, StableAdapter};
use std::fmt;
use waypoint_core::{Address, Amount, AssetId, VenueError, VenueId};

use crate::chain::{ChainState, VenueBook};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueKind {
    ConstantProduct,
    ConcentratedLiquidity,
    StableInvariant,
}

impl VenueKind {
    pub const ALL: [VenueKind; 3] = [
        Self::ConstantProduct,
        Self::ConcentratedLiquidity,
        Self::StableInvariant,
    ];
}

impl fmt::Display for VenueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ConstantProduct => "constant_product",
            Self::ConcentratedLiquidity => "concentrated_liquidity",
            Self::StableInvariant => "stable_invariant",
        };
        write!(f, "{}", name)
    }
}

/// How an adapter is registered: its id, kind, and custody account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterSpec {
    pub id: VenueId,
    pub kind: VenueKind,
    pub address: Address,
}

/// Venue-specific routing metadata for one asset pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PoolReference {
    Pair { address: Address },
    FeeTierPool { address: Address, fee: FeeTier },
    Registry(PoolConfig),
}

impl PoolReference {
    pub fn address(&self) -> &Address {
        match self {
            Self::Pair { address } | Self::FeeTierPool { address, .. } => address,
            Self::Registry(config) => &config.pool,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VenueAdapter {
    ConstantProduct(ConstantProductAdapter),
    Concentrated(ConcentratedAdapter),
    Stable(StableAdapter),
}

impl VenueAdapter {
    pub fn from_spec(spec: AdapterSpec, wrapped_native: AssetId) -> Self {
        match spec.kind {
            VenueKind::ConstantProduct => Self::ConstantProduct(ConstantProductAdapter::new(
                spec.id,
                spec.address,
                wrapped_native,
            )),
            VenueKind::ConcentratedLiquidity => {
                Self::Concentrated(ConcentratedAdapter::new(spec.id, spec.address, wrapped_native))
            }
            VenueKind::StableInvariant => {
                Self::Stable(StableAdapter::new(spec.id, spec.address, wrapped_native))
            }
        }
    }

    pub fn spec(&self) -> AdapterSpec {
        AdapterSpec {
            id: self.id().clone(),
            kind: self.kind(),
            address: self.address().clone(),
        }
    }

    pub fn id(&self) -> &VenueId {
        match self {
            Self::ConstantProduct(a) => a.id(),
            Self::Concentrated(a) => a.id(),
            Self::Stable(a) => a.id(),
        }
    }

    pub fn kind(&self) -> VenueKind {
        match self {
            Self::ConstantProduct(_) => VenueKind::ConstantProduct,
            Self::Concentrated(_) => VenueKind::ConcentratedLiquidity,
            Self::Stable(_) => VenueKind::StableInvariant,
        }
    }

    /// Account that holds a hop's input while it settles
    pub fn address(&self) -> &Address {
        match self {
            Self::ConstantProduct(a) => a.address(),
            Self::Concentrated(a) => a.address(),
            Self::Stable(a) => a.address(),
        }
    }

    pub fn wrapped_native(&self) -> &AssetId {
        match self {
            Self::ConstantProduct(a) => a.wrapped_native(),
            Self::Concentrated(a) => a.wrapped_native(),
            Self::Stable(a) => a.wrapped_native(),
        }
    }

    fn book<'c>(&self, chain: &'c ChainState) -> Result<&'c VenueBook, VenueError> {
        chain.book(self.id()).ok_or_else(|| self.no_book())
    }

    fn no_book(&self) -> VenueError {
        VenueError::NoLiquidity {
            venue: self.id().to_string(),
            pool: "none".to_string(),
        }
    }

    pub fn locate_pool(
        &self,
        chain: &ChainState,
        asset_in: &AssetId,
        asset_out: &AssetId,
    ) -> Result<PoolReference, VenueError> {
        match (self, self.book(chain)?) {
            (Self::ConstantProduct(a), VenueBook::ConstantProduct(book)) => a
                .locate_pool(book, asset_in, asset_out)
                .map(|pair| PoolReference::Pair {
                    address: pair.address.clone(),
                }),
            (Self::Concentrated(a), VenueBook::Concentrated(book)) => a
                .locate_pool(book, asset_in, asset_out)
                .map(|pool| PoolReference::FeeTierPool {
                    address: pool.address.clone(),
                    fee: pool.fee,
                }),
            (Self::Stable(a), VenueBook::Stable(book)) => a
                .locate_pool(book, asset_in, asset_out)
                .map(PoolReference::Registry),
            _ => Err(self.no_book()),
        }
    }

    /// Side-effect-free simulation against current venue state.
    pub fn quote(
        &self,
        chain: &ChainState,
        asset_in: &AssetId,
        asset_out: &AssetId,
        amount_in: Amount,
    ) -> Result<Amount, VenueError> {
        match (self, self.book(chain)?) {
            (Self::ConstantProduct(a), VenueBook::ConstantProduct(book)) => {
                a.quote(book, asset_in, asset_out, amount_in)
            }
            (Self::Concentrated(a), VenueBook::Concentrated(book)) => {
                a.quote(book, asset_in, asset_out, amount_in)
            }
            (Self::Stable(a), VenueBook::Stable(book)) => {
                a.quote(book, asset_in, asset_out, amount_in)
            }
            _ => Err(self.no_book()),
        }
    }

    /// Swap `amount_in` held at `address()` and pay the output to `recipient`.
    pub fn execute(
        &self,
        chain: &mut ChainState,
        asset_in: &AssetId,
        asset_out: &AssetId,
        amount_in: Amount,
        recipient: &Address,
    ) -> Result<Amount, VenueError> {
        let ChainState { ledger, books, .. } = chain;
        let book = books.get_mut(self.id()).ok_or_else(|| self.no_book())?;
        match (self, book) {
            (Self::ConstantProduct(a), VenueBook::ConstantProduct(book)) => {
                a.execute(book, ledger, asset_in, asset_out, amount_in, recipient)
            }
            (Self::Concentrated(a), VenueBook::Concentrated(book)) => {
                a.execute(book, ledger, asset_in, asset_out, amount_in, recipient)
            }
            (Self::Stable(a), VenueBook::Stable(book)) => {
                a.execute(book, ledger, asset_in, asset_out, amount_in, recipient)
            }
            _ => Err(self.no_book()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constant_product::{Pair, PairBook};

    fn asset(byte: u8) -> AssetId {
        AssetId::from_bytes([byte; 20])
    }

    fn make_spec(id: &str, kind: VenueKind, byte: u8) -> AdapterSpec {
        AdapterSpec {
            id: VenueId::new(id),
            kind,
            address: Address::from_bytes([byte; 20]),
        }
    }

    #[test]
    fn test_spec_round_trip() {
        let spec = make_spec("UNI-V3", VenueKind::ConcentratedLiquidity, 0xa3);
        let adapter = VenueAdapter::from_spec(spec.clone(), asset(0xc0));
        assert_eq!(adapter.spec(), spec);
        assert_eq!(adapter.wrapped_native(), &asset(0xc0));
    }

    #[test]
    fn test_spec_serde() {
        let json = format!(
            r#"{{"id":"CURVE","kind":"stable_invariant","address":"{}"}}"#,
            Address::from_bytes([0xa5; 20])
        );
        let spec: AdapterSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec.kind, VenueKind::StableInvariant);
        assert_eq!(spec.id.as_str(), "CURVE");
    }

    #[test]
    fn test_dispatch_to_own_book() {
        let adapter = VenueAdapter::from_spec(
            make_spec("SUSHI", VenueKind::ConstantProduct, 0xa2),
            asset(0xc0),
        );
        let mut book = PairBook::new();
        book.insert(Pair::new(Address::from_bytes([0xb1; 20]), asset(1), 1_000_000, asset(2), 2_000_000));

        let mut chain = ChainState::new(0);
        assert!(matches!(
            adapter.quote(&chain, &asset(1), &asset(2), 1_000),
            Err(VenueError::NoLiquidity { .. })
        ));

        chain.insert_book(VenueId::new("SUSHI"), VenueBook::ConstantProduct(book));
        assert_eq!(adapter.quote(&chain, &asset(1), &asset(2), 1_000).unwrap(), 1_992);
        assert_eq!(
            adapter.locate_pool(&chain, &asset(2), &asset(1)).unwrap(),
            PoolReference::Pair {
                address: Address::from_bytes([0xb1; 20])
            }
        );
    }

    #[test]
    fn test_mismatched_book_kind() {
        let adapter = VenueAdapter::from_spec(
            make_spec("CURVE", VenueKind::StableInvariant, 0xa5),
            asset(0xc0),
        );
        let mut chain = ChainState::new(0);
        chain.insert_book(VenueId::new("CURVE"), VenueBook::empty(VenueKind::ConstantProduct));
        assert!(adapter.quote(&chain, &asset(1), &asset(2), 1).is_err());
    }
}
