//! Router Routes

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use swap_router::{deadline_after, execute, min_output, search, Route, SwapRequest};
use waypoint_core::constants::BPS_DENOMINATOR;
use waypoint_core::VenueId;

use crate::dto::{
    amounts_to_strings, parse_address, parse_amount, parse_asset, AdapterDto, AdaptersResponse,
    ApiError, ApiFailure, AssetDto, AssetsResponse, QuoteRequest, QuoteResponse, SwapApiRequest,
    SwapApiResponse,
};
use crate::state::unix_now;
use crate::AppState;

/// Create router routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/adapters", get(get_adapters))
        .route("/bridge-assets", get(get_bridge_assets))
        .route("/tokens", get(get_tokens))
        .route("/quote", post(get_quote))
        .route("/swap", post(swap))
}

/// GET /router/adapters - Registered adapters in quote order
async fn get_adapters(State(state): State<AppState>) -> Json<AdaptersResponse> {
    let registry = state.registry().await;
    let adapters: Vec<AdapterDto> = registry.adapters().iter().map(Into::into).collect();
    let count = adapters.len();
    Json(AdaptersResponse { adapters, count })
}

/// GET /router/bridge-assets - Assets usable as interior hops
async fn get_bridge_assets(State(state): State<AppState>) -> Json<AssetsResponse> {
    let registry = state.registry().await;
    let assets: Vec<AssetDto> = registry
        .bridge_assets()
        .iter()
        .filter_map(|id| registry.token(id))
        .map(Into::into)
        .collect();
    let count = assets.len();
    Json(AssetsResponse { assets, count })
}

/// GET /router/tokens - Token registry
async fn get_tokens(State(state): State<AppState>) -> Json<AssetsResponse> {
    let registry = state.registry().await;
    let assets: Vec<AssetDto> = registry.tokens().iter().map(Into::into).collect();
    let count = assets.len();
    Json(AssetsResponse { assets, count })
}

/// POST /router/quote - Find the best route for an exact input
async fn get_quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, ApiFailure> {
    let settings = &state.config().router;
    let max_hop = request.max_hop.unwrap_or(settings.default_max_hop);
    let slippage_bps = request.slippage_bps.unwrap_or(settings.default_slippage_bps);
    if slippage_bps > BPS_DENOMINATOR {
        return Err(ApiError::bad_request(
            "invalid_slippage",
            format!("slippage_bps {} exceeds {}", slippage_bps, BPS_DENOMINATOR),
        ));
    }

    let asset_in = parse_asset("asset_in", &request.asset_in)?;
    let asset_out = parse_asset("asset_out", &request.asset_out)?;
    let amount_in = parse_amount("amount_in", &request.amount_in)?;

    // exhaustive search runs on the blocking pool against a snapshot
    let (registry, chain) = {
        let registry = state.registry().await;
        let chain = state.chain().await;
        (registry.clone(), chain.clone())
    };
    let result = tokio::task::spawn_blocking(move || {
        search(&registry, &chain, max_hop, &asset_in, &asset_out, amount_in)
    })
    .await
    .map_err(|e| ApiError::internal(format!("quote task failed: {}", e)))?
    .map_err(ApiError::from_route)?;

    let amount_out = result.quote.amount_out();
    Ok(Json(QuoteResponse {
        adapters: result.route.adapters.iter().map(|v| v.to_string()).collect(),
        path: result.route.path.iter().map(|a| a.to_string()).collect(),
        amounts: amounts_to_strings(&result.quote.amounts),
        amount_out: amount_out.to_string(),
        amount_out_min: min_output(amount_out, slippage_bps).to_string(),
    }))
}

/// POST /router/swap - Execute a route atomically
async fn swap(
    State(state): State<AppState>,
    Json(request): Json<SwapApiRequest>,
) -> Result<Json<SwapApiResponse>, ApiFailure> {
    let path = request
        .path
        .iter()
        .map(|raw| parse_asset("path", raw))
        .collect::<Result<Vec<_>, _>>()?;
    let route = Route {
        adapters: request.adapters.into_iter().map(VenueId::new).collect(),
        path,
    };
    let amount_in = parse_amount("amount_in", &request.amount_in)?;
    let amount_out_min = parse_amount("amount_out_min", &request.amount_out_min)?;
    let native_value = request
        .native_value
        .as_deref()
        .map(|raw| parse_amount("native_value", raw))
        .transpose()?;
    let sender = parse_address("sender", &request.sender)?;
    let recipient = parse_address("recipient", &request.recipient)?;

    let registry = state.registry().await;
    let mut chain = state.chain_mut().await;
    chain.advance_to(unix_now());
    let deadline = request
        .deadline
        .unwrap_or_else(|| deadline_after(chain.block_timestamp, state.config().router.deadline_secs));

    let swap = SwapRequest {
        route,
        amount_in,
        amount_out_min,
        sender,
        recipient,
        deadline,
        native_value,
    };
    let receipt = execute(&registry, &mut chain, &swap).map_err(ApiError::from_route)?;

    Ok(Json(SwapApiResponse {
        amounts: amounts_to_strings(&receipt.amounts),
        amount_out: receipt.amount_out.to_string(),
    }))
}
