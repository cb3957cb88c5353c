//! Constant-Product Adapter
//!
//! Wraps one pair book behind the venue quote/execute contract. Several
//! adapters of this kind can coexist (one per forked venue), each with its own
//! book and custody account.

use tracing::debug;
use waypoint_core::{
    settle_hop, Address, Amount, AssetId, HopLeg, Ledger, VenueError, VenueId,
};

use crate::calculator::get_amount_out;
use crate::state::{Pair, PairBook};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantProductAdapter {
    id: VenueId,
    address: Address,
    wrapped_native: AssetId,
}

impl ConstantProductAdapter {
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

    /// Custody account holding a hop's input while it settles
    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn wrapped_native(&self) -> &AssetId {
        &self.wrapped_native
    }

    /// Find the pair trading `asset_in` against `asset_out`.
    pub fn locate_pool<'b>(
        &self,
        book: &'b PairBook,
        asset_in: &AssetId,
        asset_out: &AssetId,
    ) -> Result<&'b Pair, VenueError> {
        let venue_in = asset_in.to_wrapped(&self.wrapped_native);
        let venue_out = asset_out.to_wrapped(&self.wrapped_native);
        if venue_in == venue_out {
            return Err(self.no_pool(asset_in, asset_out));
        }
        book.get_pair(&venue_in, &venue_out)
            .ok_or_else(|| self.no_pool(asset_in, asset_out))
    }

    /// Simulate a swap against the current reserves.
    pub fn quote(
        &self,
        book: &PairBook,
        asset_in: &AssetId,
        asset_out: &AssetId,
        amount_in: Amount,
    ) -> Result<Amount, VenueError> {
        let pair = self.locate_pool(book, asset_in, asset_out)?;
        let venue_in = asset_in.to_wrapped(&self.wrapped_native);
        let (reserve_in, reserve_out) = pair
            .reserves_for(&venue_in)
            .ok_or_else(|| self.no_pool(asset_in, asset_out))?;

        if reserve_in == 0 || reserve_out == 0 {
            return Err(VenueError::NoLiquidity {
                venue: self.id.to_string(),
                pool: pair.address.to_string(),
            });
        }

        Ok(get_amount_out(amount_in, reserve_in, reserve_out))
    }

    /// Swap `amount_in` held by this adapter and pay the output to `recipient`.
    pub fn execute(
        &self,
        book: &mut PairBook,
        ledger: &mut Ledger,
        asset_in: &AssetId,
        asset_out: &AssetId,
        amount_in: Amount,
        recipient: &Address,
    ) -> Result<Amount, VenueError> {
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
        if let Some(pair) = book.get_pair_mut(&venue_in, &venue_out) {
            pair.apply_swap(&venue_in, amount_in, amount_out);
        }

        debug!(
            venue = %self.id,
            %asset_in,
            %asset_out,
            amount_in,
            amount_out,
            "constant-product swap settled"
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
