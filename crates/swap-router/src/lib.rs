//! Swap Router
//!
//! Aggregates the venue adapters behind one closed sum type, searches the
//! bridge-asset graph for the maximum-output route, and executes routes
//! atomically against the chain state.

pub mod adapter;
pub mod chain;
pub mod executor;
pub mod registry;
pub mod search;

#[cfg(test)]
mod fixtures;

// Re-exports
pub use adapter::{AdapterSpec, PoolReference, VenueAdapter, VenueKind};
pub use chain::{ChainState, VenueBook};
pub use executor::{execute, ExecutionReceipt, SwapRequest};
pub use registry::Registry;
pub use search::{
    candidate_paths, deadline_after, min_output, quote_route, search, Quote, Route, SearchResult,
};
