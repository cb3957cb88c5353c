//! Data Transfer Objects for API requests and responses
//!
//! Amounts travel as decimal strings so no client loses precision on values
//! beyond 2^53.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use swap_router::{AdapterSpec, VenueAdapter, VenueKind};
use waypoint_core::{Address, AdminError, Amount, Asset, AssetId, RouteError, VenueId};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Generic API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

/// Error half of every handler result
pub type ApiFailure = (StatusCode, Json<ApiError>);

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> ApiFailure {
        (StatusCode::BAD_REQUEST, Json(Self::new(code, message)))
    }

    pub fn internal(message: impl Into<String>) -> ApiFailure {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(Self::new("internal_error", message)),
        )
    }

    pub fn from_route(error: RouteError) -> ApiFailure {
        (
            status(error.status_code()),
            Json(Self::new(error.error_code(), error.to_string())),
        )
    }

    pub fn from_admin(error: AdminError) -> ApiFailure {
        (
            status(error.status_code()),
            Json(Self::new(error.error_code(), error.to_string())),
        )
    }
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Parse a decimal amount field.
pub fn parse_amount(field: &str, raw: &str) -> Result<Amount, ApiFailure> {
    raw.trim().parse::<Amount>().map_err(|e| {
        ApiError::bad_request("invalid_amount", format!("{}: {} ({})", field, raw, e))
    })
}

pub fn parse_address(field: &str, raw: &str) -> Result<Address, ApiFailure> {
    Address::parse(raw)
        .map_err(|e| ApiError::bad_request("invalid_address", format!("{}: {}", field, e)))
}

pub fn parse_asset(field: &str, raw: &str) -> Result<AssetId, ApiFailure> {
    AssetId::parse(raw)
        .map_err(|e| ApiError::bad_request("invalid_address", format!("{}: {}", field, e)))
}

/// Registered adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterDto {
    pub id: String,
    pub kind: VenueKind,
    pub address: String,
}

impl From<&VenueAdapter> for AdapterDto {
    fn from(adapter: &VenueAdapter) -> Self {
        Self {
            id: adapter.id().to_string(),
            kind: adapter.kind(),
            address: adapter.address().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptersResponse {
    pub adapters: Vec<AdapterDto>,
    pub count: usize,
}

/// Registered token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDto {
    pub id: String,
    pub symbol: String,
    pub decimals: u8,
    pub is_native: bool,
}

impl From<&Asset> for AssetDto {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id.to_string(),
            symbol: asset.symbol.clone(),
            decimals: asset.decimals,
            is_native: asset.is_native,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsResponse {
    pub assets: Vec<AssetDto>,
    pub count: usize,
}

/// Route search request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Defaults to the configured hop bound
    #[serde(default)]
    pub max_hop: Option<usize>,
    pub asset_in: String,
    pub asset_out: String,
    pub amount_in: String,
    /// Defaults to the configured slippage
    #[serde(default)]
    pub slippage_bps: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub adapters: Vec<String>,
    pub path: Vec<String>,
    pub amounts: Vec<String>,
    pub amount_out: String,
    pub amount_out_min: String,
}

/// Swap execution request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapApiRequest {
    pub adapters: Vec<String>,
    pub path: Vec<String>,
    pub amount_in: String,
    pub amount_out_min: String,
    pub sender: String,
    pub recipient: String,
    /// Unix seconds; defaults to now plus the configured window
    #[serde(default)]
    pub deadline: Option<u64>,
    #[serde(default)]
    pub native_value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapApiResponse {
    pub amounts: Vec<String>,
    pub amount_out: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterSpecDto {
    pub id: String,
    pub kind: VenueKind,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetAdaptersRequest {
    pub caller: String,
    pub adapters: Vec<AdapterSpecDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetBridgeAssetsRequest {
    pub caller: String,
    pub assets: Vec<String>,
}

/// Result of an administrative update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminResponse {
    pub updated: String,
    pub count: usize,
}

impl AdapterSpecDto {
    pub fn into_spec(self) -> Result<AdapterSpec, ApiFailure> {
        let address = parse_address("address", &self.address)?;
        Ok(AdapterSpec {
            id: VenueId::new(self.id),
            kind: self.kind,
            address,
        })
    }
}

pub fn amounts_to_strings(amounts: &[Amount]) -> Vec<String> {
    amounts.iter().map(|a| a.to_string()).collect()
}
