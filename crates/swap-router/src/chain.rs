//! Chain State
//!
//! Everything an execution can touch: participant balances, each venue's
//! pool book, and the settlement clock. Executions stage their changes on a
//! clone and commit by swapping the clone in.

use std::collections::HashMap;

use concentrated::PoolBook;
use constant_product::PairBook;
use stable::StableBook;
use waypoint_core::{Ledger, Timestamp, VenueId};

use crate::adapter::VenueKind;

/// Pool book of one venue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VenueBook {
    ConstantProduct(PairBook),
    Concentrated(PoolBook),
    Stable(StableBook),
}

impl VenueBook {
    /// Empty book matching a venue kind.
    pub fn empty(kind: VenueKind) -> Self {
        match kind {
            VenueKind::ConstantProduct => Self::ConstantProduct(PairBook::new()),
            VenueKind::ConcentratedLiquidity => Self::Concentrated(PoolBook::new()),
            VenueKind::StableInvariant => Self::Stable(StableBook::new()),
        }
    }

    pub fn kind(&self) -> VenueKind {
        match self {
            Self::ConstantProduct(_) => VenueKind::ConstantProduct,
            Self::Concentrated(_) => VenueKind::ConcentratedLiquidity,
            Self::Stable(_) => VenueKind::StableInvariant,
        }
    }

    pub fn pool_count(&self) -> usize {
        match self {
            Self::ConstantProduct(book) => book.len(),
            Self::Concentrated(book) => book.len(),
            Self::Stable(book) => book.len(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainState {
    pub ledger: Ledger,
    pub books: HashMap<VenueId, VenueBook>,
    /// Settlement clock deadlines are checked against
    pub block_timestamp: Timestamp,
}

impl ChainState {
    pub fn new(block_timestamp: Timestamp) -> Self {
        Self {
            block_timestamp,
            ..Self::default()
        }
    }

    pub fn book(&self, venue: &VenueId) -> Option<&VenueBook> {
        self.books.get(venue)
    }

    pub fn insert_book(&mut self, venue: VenueId, book: VenueBook) {
        self.books.insert(venue, book);
    }

    /// Move the settlement clock forward. Earlier timestamps are ignored.
    pub fn advance_to(&mut self, timestamp: Timestamp) -> Timestamp {
        self.block_timestamp = self.block_timestamp.max(timestamp);
        self.block_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_is_monotonic() {
        let mut chain = ChainState::new(100);
        assert_eq!(chain.advance_to(150), 150);
        assert_eq!(chain.advance_to(120), 150);
        assert_eq!(chain.block_timestamp, 150);
    }

    #[test]
    fn test_empty_book_kind() {
        for kind in VenueKind::ALL {
            let book = VenueBook::empty(kind);
            assert_eq!(book.kind(), kind);
            assert_eq!(book.pool_count(), 0);
        }
    }
}
