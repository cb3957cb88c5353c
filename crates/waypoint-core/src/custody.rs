//! Hop settlement shared by every venue adapter
//!
//! An adapter holds a hop's input only transiently. Settling a hop moves that
//! input into venue custody and pays the venue's output to the recipient.
//! Native legs are wrapped on the way in and unwrapped on the way out, so the
//! venue itself only ever sees the wrapped asset.

use crate::errors::LedgerError;
use crate::ledger::Ledger;
use crate::types::{Address, Amount, AssetId};

/// One hop's balance movements
#[derive(Debug, Clone)]
pub struct HopLeg<'a> {
    pub adapter: &'a Address,
    pub recipient: &'a Address,
    pub asset_in: &'a AssetId,
    pub asset_out: &'a AssetId,
    pub wrapped_native: &'a AssetId,
    pub amount_in: Amount,
    pub amount_out: Amount,
}

/// Apply a hop to the ledger.
///
/// The adapter's input balance is checked up front, so a failure leaves the
/// ledger untouched.
pub fn settle_hop(ledger: &mut Ledger, leg: &HopLeg<'_>) -> Result<(), LedgerError> {
    let available = ledger.balance(leg.adapter, leg.asset_in);
    if available < leg.amount_in {
        return Err(LedgerError::InsufficientBalance {
            holder: leg.adapter.to_string(),
            asset: leg.asset_in.to_string(),
            required: leg.amount_in,
            available,
        });
    }

    if leg.asset_in.is_native() {
        ledger.wrap(leg.adapter, leg.wrapped_native, leg.amount_in)?;
    }
    let venue_in = leg.asset_in.to_wrapped(leg.wrapped_native);
    ledger.debit(leg.adapter, &venue_in, leg.amount_in)?;

    if leg.asset_out.is_native() {
        ledger.credit(leg.adapter, leg.wrapped_native, leg.amount_out)?;
        ledger.unwrap(leg.adapter, leg.wrapped_native, leg.amount_out)?;
        ledger.transfer(leg.adapter, leg.recipient, leg.asset_out, leg.amount_out)
    } else {
        ledger.credit(leg.recipient, leg.asset_out, leg.amount_out)
    }
}
