//! Token and Adapter Registry
//!
//! Process-wide configuration passed explicitly into search and execute.
//! Only the owner can replace the adapter set or the bridge set.

use std::collections::HashSet;

use tracing::{info, warn};
use waypoint_core::{AdminError, Address, Asset, AssetId, VenueId};

use crate::adapter::{AdapterSpec, VenueAdapter};

#[derive(Debug, Clone)]
pub struct Registry {
    owner: Address,
    wrapped_native: AssetId,
    tokens: Vec<Asset>,
    adapters: Vec<VenueAdapter>,
    bridge_assets: Vec<AssetId>,
}

impl Registry {
    pub fn new(owner: Address, wrapped_native: AssetId) -> Self {
        Self {
            owner,
            wrapped_native,
            tokens: Vec::new(),
            adapters: Vec::new(),
            bridge_assets: Vec::new(),
        }
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn wrapped_native(&self) -> &AssetId {
        &self.wrapped_native
    }

    fn ensure_owner(&self, caller: &Address) -> Result<(), AdminError> {
        if caller != &self.owner {
            warn!(%caller, "rejected registry update from non-owner");
            return Err(AdminError::Unauthorized {
                caller: caller.to_string(),
            });
        }
        Ok(())
    }

    /// Add a token, replacing any earlier entry with the same identity.
    pub fn register_token(&mut self, caller: &Address, asset: Asset) -> Result<(), AdminError> {
        self.ensure_owner(caller)?;
        match self.tokens.iter_mut().find(|t| t.id == asset.id) {
            Some(existing) => *existing = asset,
            None => self.tokens.push(asset),
        }
        Ok(())
    }

    pub fn tokens(&self) -> &[Asset] {
        &self.tokens
    }

    pub fn token(&self, id: &AssetId) -> Option<&Asset> {
        self.tokens.iter().find(|t| &t.id == id)
    }

    /// Replace the adapter set. Registration order is quote order.
    pub fn set_adapters(
        &mut self,
        caller: &Address,
        specs: Vec<AdapterSpec>,
    ) -> Result<(), AdminError> {
        self.ensure_owner(caller)?;

        let mut seen: HashSet<&VenueId> = HashSet::new();
        for spec in &specs {
            if !spec.id.is_valid() {
                return Err(AdminError::InvalidVenueId {
                    venue: spec.id.to_string(),
                });
            }
            if !seen.insert(&spec.id) {
                return Err(AdminError::DuplicateAdapter {
                    venue: spec.id.to_string(),
                });
            }
        }

        self.adapters = specs
            .into_iter()
            .map(|spec| VenueAdapter::from_spec(spec, self.wrapped_native.clone()))
            .collect();
        info!(count = self.adapters.len(), "adapter set replaced");
        Ok(())
    }

    pub fn adapters(&self) -> &[VenueAdapter] {
        &self.adapters
    }

    pub fn adapter(&self, id: &VenueId) -> Option<&VenueAdapter> {
        self.adapters.iter().find(|a| a.id() == id)
    }

    /// Replace the bridge set. Every asset must be a registered token.
    pub fn set_bridge_assets(
        &mut self,
        caller: &Address,
        assets: Vec<AssetId>,
    ) -> Result<(), AdminError> {
        self.ensure_owner(caller)?;

        let mut bridge: Vec<AssetId> = Vec::with_capacity(assets.len());
        for asset in assets {
            if self.token(&asset).is_none() {
                return Err(AdminError::UnknownAsset {
                    asset: asset.to_string(),
                });
            }
            if !bridge.contains(&asset) {
                bridge.push(asset);
            }
        }

        self.bridge_assets = bridge;
        info!(count = self.bridge_assets.len(), "bridge set replaced");
        Ok(())
    }

    pub fn bridge_assets(&self) -> &[AssetId] {
        &self.bridge_assets
    }
}
