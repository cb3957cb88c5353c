//! Concentrated-Liquidity Adapter

use tracing::debug;
use waypoint_core::{
    settle_hop, Address, Amount, AssetId, HopLeg, Ledger, VenueError, VenueId,
};

use crate::quoter::{quote_exact_input_single, resolve_fee_tier};
use crate::state::{ClPool, PoolBook};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcentratedAdapter {
    id: VenueId,
    address: Address,
    wrapped_native: AssetId,
}

impl ConcentratedAdapter {
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

    /// Resolve the fee-tier pool serving the pair.
    pub fn locate_pool<'b>(
        &self,
        book: &'b PoolBook,
        asset_in: &AssetId,
        asset_out: &AssetId,
    ) -> Result<&'b ClPool, VenueError> {
        let venue_in = asset_in.to_wrapped(&self.wrapped_native);
        let venue_out = asset_out.to_wrapped(&self.wrapped_native);
        if venue_in == venue_out {
            return Err(self.no_pool(asset_in, asset_out));
        }
        resolve_fee_tier(book, &venue_in, &venue_out)
            .and_then(|fee| book.get_pool(&venue_in, &venue_out, fee))
            .ok_or_else(|| self.no_pool(asset_in, asset_out))
    }

    pub fn quote(
        &self,
        book: &PoolBook,
        asset_in: &AssetId,
        asset_out: &AssetId,
        amount_in: Amount,
    ) -> Result<Amount, VenueError> {
        let pool = self.locate_pool(book, asset_in, asset_out)?;
        if pool.liquidity() == 0 {
            return Err(VenueError::NoLiquidity {
                venue: self.id.to_string(),
                pool: pool.address.to_string(),
            });
        }

        let venue_in = asset_in.to_wrapped(&self.wrapped_native);
        let venue_out = asset_out.to_wrapped(&self.wrapped_native);
        quote_exact_input_single(book, &venue_in, &venue_out, pool.fee, amount_in)
            .ok_or_else(|| self.no_pool(asset_in, asset_out))
    }

    pub fn execute(
        &self,
        book: &mut PoolBook,
        ledger: &mut Ledger,
        asset_in: &AssetId,
        asset_out: &AssetId,
        amount_in: Amount,
        recipient: &Address,
    ) -> Result<Amount, VenueError> {
        let fee = self.locate_pool(book, asset_in, asset_out)?.fee;
        let amount_out = self.quote(book, asset_in, asset_out, amount_in)?;
        if amount_in > 0 && amount_out == 0 {
            return Err(VenueError::InsufficientOutput { got: 0, min: 1 });
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

        let venue_in = asset_in.to_wrapped(&self.wrapped_native);
        let venue_out = asset_out.to_wrapped(&self.wrapped_native);
        if let Some(pool) = book.get_pool_mut(&venue_in, &venue_out, fee) {
            pool.apply_swap(&venue_in, amount_in, amount_out);
        }

        debug!(
            venue = %self.id,
            %fee,
            amount_in,
            amount_out,
            "concentrated swap settled"
        );
        Ok(amount_out)
    }

    fn no_pool(&self, asset_in: &AssetId, asset_out: &AssetId) -> VenueError {
        VenueError::NoPool {
            venue: self.id.to_string(),
            asset_in: asset_in.to_string(),
            asset_out: asset_out.to_string(),
        }
    }
}
