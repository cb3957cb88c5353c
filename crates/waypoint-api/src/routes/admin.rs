//! Admin Routes
//!
//! Owner-only registry updates. Adapter changes take the registry lock before
//! the chain lock, same as swaps.

use axum::{extract::State, routing::put, Json, Router};
use swap_router::VenueBook;
use tracing::info;

use crate::dto::{
    parse_address, parse_asset, AdminResponse, ApiError, ApiFailure, SetAdaptersRequest,
    SetBridgeAssetsRequest,
};
use crate::AppState;

/// Create admin routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/adapters", put(set_adapters))
        .route("/bridge-assets", put(set_bridge_assets))
}

/// PUT /admin/adapters - Replace the adapter list
async fn set_adapters(
    State(state): State<AppState>,
    Json(request): Json<SetAdaptersRequest>,
) -> Result<Json<AdminResponse>, ApiFailure> {
    let caller = parse_address("caller", &request.caller)?;
    let specs = request
        .adapters
        .into_iter()
        .map(|dto| dto.into_spec())
        .collect::<Result<Vec<_>, _>>()?;

    let mut registry = state.registry_mut().await;
    let mut chain = state.chain_mut().await;
    registry
        .set_adapters(&caller, specs)
        .map_err(ApiError::from_admin)?;

    // adapters without a matching book start with no pools
    for adapter in registry.adapters() {
        let kind = adapter.kind();
        let stale = chain.book(adapter.id()).map_or(true, |book| book.kind() != kind);
        if stale {
            info!(venue = %adapter.id(), %kind, "opening empty venue book");
            chain.insert_book(adapter.id().clone(), VenueBook::empty(kind));
        }
    }

    Ok(Json(AdminResponse {
        updated: "adapters".to_string(),
        count: registry.adapters().len(),
    }))
}

/// PUT /admin/bridge-assets - Replace the bridge asset list
async fn set_bridge_assets(
    State(state): State<AppState>,
    Json(request): Json<SetBridgeAssetsRequest>,
) -> Result<Json<AdminResponse>, ApiFailure> {
    let caller = parse_address("caller", &request.caller)?;
    let assets = request
        .assets
        .iter()
        .map(|raw| parse_asset("assets", raw))
        .collect::<Result<Vec<_>, _>>()?;

    let mut registry = state.registry_mut().await;
    registry
        .set_bridge_assets(&caller, assets)
        .map_err(ApiError::from_admin)?;

    Ok(Json(AdminResponse {
        updated: "bridge_assets".to_string(),
        count: registry.bridge_assets().len(),
    }))
}
