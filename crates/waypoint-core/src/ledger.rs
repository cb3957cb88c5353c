//! Settlement ledger
//!
//! Participant balances keyed by (holder, asset). Venue custody (pool
//! reserves) lives in the venue books, not here: moving an asset into a pool
//! is a `debit`, paying out of a pool is a `credit`.
//!
//! The ledger is a plain value. Callers that need all-or-nothing semantics
//! stage their changes on a clone and swap it in on success.

use std::collections::HashMap;

use crate::errors::LedgerError;
use crate::types::{Address, Amount, AssetId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    balances: HashMap<(Address, AssetId), Amount>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self, holder: &Address, asset: &AssetId) -> Amount {
        self.balances
            .get(&(holder.clone(), asset.clone()))
            .copied()
            .unwrap_or(0)
    }

    pub fn credit(
        &mut self,
        holder: &Address,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if amount == 0 {
            return Ok(());
        }
        let entry = self
            .balances
            .entry((holder.clone(), asset.clone()))
            .or_insert(0);
        *entry = entry.checked_add(amount).ok_or_else(|| LedgerError::Overflow {
            asset: asset.to_string(),
        })?;
        Ok(())
    }

    pub fn debit(
        &mut self,
        holder: &Address,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if amount == 0 {
            return Ok(());
        }
        let key = (holder.clone(), asset.clone());
        let available = self.balances.get(&key).copied().unwrap_or(0);
        if available < amount {
            return Err(LedgerError::InsufficientBalance {
                holder: holder.to_string(),
                asset: asset.to_string(),
                required: amount,
                available,
            });
        }

        let remaining = available - amount;
        if remaining == 0 {
            self.balances.remove(&key);
        } else {
            self.balances.insert(key, remaining);
        }
        Ok(())
    }

    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.debit(from, asset, amount)?;
        self.credit(to, asset, amount)
    }

    /// Convert `amount` of the holder's native balance into the wrapped asset.
    pub fn wrap(
        &mut self,
        holder: &Address,
        wrapped_native: &AssetId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.debit(holder, &AssetId::native(), amount)?;
        self.credit(holder, wrapped_native, amount)
    }

    /// Convert `amount` of the holder's wrapped balance back into native.
    pub fn unwrap(
        &mut self,
        holder: &Address,
        wrapped_native: &AssetId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.debit(holder, wrapped_native, amount)?;
        self.credit(holder, &AssetId::native(), amount)
    }

    /// Non-zero balances of a single holder, sorted by asset.
    pub fn holdings(&self, holder: &Address) -> Vec<(AssetId, Amount)> {
        let mut out: Vec<(AssetId, Amount)> = self
            .balances
            .iter()
            .filter(|((h, _), _)| h == holder)
            .map(|((_, asset), amount)| (asset.clone(), *amount))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Sum of all participant balances of an asset.
    pub fn total(&self, asset: &AssetId) -> Amount {
        self.balances
            .iter()
            .filter(|((_, a), _)| a == asset)
            .map(|(_, amount)| *amount)
            .sum()
    }
}
