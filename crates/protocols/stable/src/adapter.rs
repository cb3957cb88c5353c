//! Stable Invariant Adapter
//!
//! Resolves a pair to a registry pool before quoting or executing. The
//! resolved `is_underlying` flag selects `get_dy` / `exchange` or their
//! underlying counterparts, the same way on both paths.

use tracing::debug;
use waypoint_core::{
    settle_hop, Address, Amount, AssetId, HopLeg, Ledger, VenueError, VenueId,
};

use crate::registry::{PoolConfig, StableBook};
use crate::state::StablePool;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StableAdapter {
    id: VenueId,
    address: Address,
    wrapped_native: AssetId,
}

impl StableAdapter {
    pub fn new(id: VenueId, address: Address, wrapped_native: AssetId) -> Self {
        Self {
            id,
            address,
            wrapped_native,
        }
    }

    pub fn id(&self) -> &VenueId {
        &self.id
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn wrapped_native(&self) -> &AssetId {
        &self.wrapped_native
    }

    pub fn locate_pool(
        &self,
        book: &StableBook,
        asset_in: &AssetId,
        asset_out: &AssetId,
    ) -> Result<PoolConfig, VenueError> {
        let venue_in = asset_in.to_wrapped(&self.wrapped_native);
        let venue_out = asset_out.to_wrapped(&self.wrapped_native);
        book.locate(&venue_in, &venue_out)
            .ok_or_else(|| VenueError::NoPool {
                venue: self.id.to_string(),
                asset_in: asset_in.to_string(),
                asset_out: asset_out.to_string(),
            })
    }

    pub fn quote(
        &self,
        book: &StableBook,
        asset_in: &AssetId,
        asset_out: &AssetId,
        amount_in: Amount,
    ) -> Result<Amount, VenueError> {
        let config = self.locate_pool(book, asset_in, asset_out)?;
        let pool = self.pool(book, &config)?;
        let quoted = if config.is_underlying {
            pool.get_dy_underlying(config.i, config.j, amount_in)
        } else {
            pool.get_dy(config.i, config.j, amount_in)
        };
        quoted.ok_or_else(|| self.no_liquidity(&config))
    }

    pub fn execute(
        &self,
        book: &mut StableBook,
        ledger: &mut Ledger,
        asset_in: &AssetId,
        asset_out: &AssetId,
        amount_in: Amount,
        recipient: &Address,
    ) -> Result<Amount, VenueError> {
        let config = self.locate_pool(book, asset_in, asset_out)?;
        let amount_out = self.quote(book, asset_in, asset_out, amount_in)?;
        if amount_in > 0 && amount_out == 0 {
            return Err(VenueError::InsufficientOutput { got: 0, min: 1 });
        }

        // the book is replaced only after the hop settles
        let mut swapped = self.pool(book, &config)?.clone();
        let settled = if config.is_underlying {
            swapped.exchange_underlying(config.i, config.j, amount_in)
        } else {
            swapped.exchange(config.i, config.j, amount_in)
        };
        if settled != Some(amount_out) {
            return Err(VenueError::InsufficientOutput {
                got: settled.unwrap_or(0),
                min: amount_out,
            });
        }

        settle_hop(
            ledger,
            &HopLeg {
                adapter: &self.address,
                recipient,
                asset_in,
                asset_out,
                wrapped_native: &self.wrapped_native,
                amount_in,
                amount_out,
            },
        )?;

        let pool = book
            .pool_mut(&config.pool)
            .ok_or_else(|| self.no_liquidity(&config))?;
        *pool = swapped;

        debug!(
            venue = %self.id,
            pool = %config.pool,
            i = config.i,
            j = config.j,
            underlying = config.is_underlying,
            amount_in,
            amount_out,
            "stable swap settled"
        );
        Ok(amount_out)
    }

    fn pool<'b>(&self, book: &'b StableBook, config: &PoolConfig) -> Result<&'b StablePool, VenueError> {
        book.pool(&config.pool)
            .ok_or_else(|| self.no_liquidity(config))
    }

    fn no_liquidity(&self, config: &PoolConfig) -> VenueError {
        VenueError::NoLiquidity {
            venue: self.id.to_string(),
            pool: config.pool.to_string(),
        }
    }
}
