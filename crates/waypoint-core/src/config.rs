//! Configuration types for Waypoint

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::types::constants::{BPS_DENOMINATOR, DEFAULT_WRAPPED_NATIVE, MAX_HOP, MIN_HOP};
use crate::types::AssetId;

/// Chain-level settings shared by every adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Wrapped representation of the native asset
    #[serde(default = "default_wrapped_native")]
    pub wrapped_native: AssetId,

    /// Decimals of the native asset
    #[serde(default = "default_native_decimals")]
    pub native_decimals: u8,
}

fn default_wrapped_native() -> AssetId {
    AssetId(DEFAULT_WRAPPED_NATIVE.to_string())
}

fn default_native_decimals() -> u8 {
    18
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            wrapped_native: default_wrapped_native(),
            native_decimals: default_native_decimals(),
        }
    }
}

/// Defaults applied to router requests that omit them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterSettings {
    /// Hop bound used when a quote request has none
    #[serde(default = "default_max_hop")]
    pub default_max_hop: usize,

    /// Slippage tolerance in basis points (10 = 0.1%)
    #[serde(default = "default_slippage_bps")]
    pub default_slippage_bps: u32,

    /// Seconds added to the settlement clock when a swap has no deadline
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,
}

fn default_max_hop() -> usize {
    3
}

fn default_slippage_bps() -> u32 {
    10
}

fn default_deadline_secs() -> u64 {
    60
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            default_max_hop: default_max_hop(),
            default_slippage_bps: default_slippage_bps(),
            deadline_secs: default_deadline_secs(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub chain: ChainConfig,

    #[serde(default)]
    pub router: RouterSettings,

    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

fn default_api_port() -> u16 {
    19090
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::default(),
            router: RouterSettings::default(),
            api_port: default_api_port(),
        }
    }
}

impl AppConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {}: {}", path.display(), e)))?;
        let config: AppConfig =
            serde_json::from_str(&raw).map_err(|e| Error::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let hop = self.router.default_max_hop;
        if !(MIN_HOP..=MAX_HOP).contains(&hop) {
            return Err(Error::Config(format!(
                "default_max_hop {} outside {}..={}",
                hop, MIN_HOP, MAX_HOP
            )));
        }
        if self.router.default_slippage_bps > BPS_DENOMINATOR {
            return Err(Error::Config(format!(
                "default_slippage_bps {} exceeds {}",
                self.router.default_slippage_bps, BPS_DENOMINATOR
            )));
        }
        if self.chain.wrapped_native.is_native() {
            return Err(Error::Config(
                "wrapped_native cannot be the native sentinel".to_string(),
            ));
        }
        Ok(())
    }
}
