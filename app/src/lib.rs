//! Waypoint server library

pub mod seed;

use anyhow::Context;
use waypoint_api::state::unix_now;
use waypoint_api::{start_server, AppState};
use waypoint_core::AppConfig;

use seed::MarketSeed;

/// Path of the JSON config file
pub const CONFIG_ENV: &str = "WAYPOINT_CONFIG";

/// Path of the JSON market seed
pub const MARKET_ENV: &str = "WAYPOINT_MARKET";

/// Load the config named by `WAYPOINT_CONFIG`, or the defaults.
pub fn load_config() -> anyhow::Result<AppConfig> {
    match std::env::var(CONFIG_ENV) {
        Ok(path) => {
            AppConfig::load(&path).with_context(|| format!("load config from {}", path))
        }
        Err(_) => {
            tracing::info!("{} not set, using default config", CONFIG_ENV);
            Ok(AppConfig::default())
        }
    }
}

/// Load the market named by `WAYPOINT_MARKET`, or the bundled one.
pub fn load_market() -> anyhow::Result<MarketSeed> {
    match std::env::var(MARKET_ENV) {
        Ok(path) => MarketSeed::load(path),
        Err(_) => {
            tracing::info!("{} not set, using bundled market", MARKET_ENV);
            MarketSeed::bundled()
        }
    }
}

/// Run the Waypoint server
pub async fn run() -> anyhow::Result<()> {
    tracing::info!("Starting Waypoint");

    let config = load_config()?;
    let (registry, chain) = load_market()?.build(&config, unix_now())?;
    let state = AppState::new(config, registry, chain);
    start_server(state).await.context("API server stopped")?;
    Ok(())
}
