//! Stable Invariant Venue
//!
//! Plain and factory (meta) pools priced by the StableSwap invariant, crypto
//! pools priced by the constant-product rule. Pools are found through three
//! registries, and a pair may resolve to a pool's own coins or to its
//! underlying assets.

pub mod adapter;
pub mod constants;
pub mod math;
pub mod registry;
pub mod state;

// Re-exports
pub use adapter::StableAdapter;
pub use registry::{PoolConfig, RegistryKind, StableBook};
pub use state::{PoolCoin, PoolKind, StableError, StablePool, UnderlyingCoin};
