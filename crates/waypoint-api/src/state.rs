//! Application state shared across API handlers
//!
//! Lock order is registry before chain. Searches hold both read locks,
//! swaps hold the chain write lock, and administrative updates hold the
//! registry write lock, so an update never overlaps a search or swap.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use swap_router::{ChainState, Registry};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use waypoint_core::{AppConfig, Timestamp};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    registry: RwLock<Registry>,
    chain: RwLock<ChainState>,
}

impl AppState {
    pub fn new(config: AppConfig, registry: Registry, chain: ChainState) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                registry: RwLock::new(registry),
                chain: RwLock::new(chain),
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub async fn registry(&self) -> RwLockReadGuard<'_, Registry> {
        self.inner.registry.read().await
    }

    pub async fn registry_mut(&self) -> RwLockWriteGuard<'_, Registry> {
        self.inner.registry.write().await
    }

    pub async fn chain(&self) -> RwLockReadGuard<'_, ChainState> {
        self.inner.chain.read().await
    }

    pub async fn chain_mut(&self) -> RwLockWriteGuard<'_, ChainState> {
        self.inner.chain.write().await
    }
}

/// Wall-clock seconds, used to move the settlement clock forward
pub fn unix_now() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
