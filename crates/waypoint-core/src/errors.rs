//! Error types for Waypoint

use thiserror::Error;

use crate::types::{Amount, Timestamp};

/// Core errors that can occur in Waypoint
#[derive(Debug, Error)]
pub enum Error {
    #[error("Venue error: {0}")]
    Venue(#[from] VenueError),

    #[error("Route error: {0}")]
    Route(#[from] RouteError),

    #[error("Admin error: {0}")]
    Admin(#[from] AdminError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Balance movement errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Insufficient balance of {asset} for {holder}: need {required}, have {available}")]
    InsufficientBalance {
        holder: String,
        asset: String,
        required: Amount,
        available: Amount,
    },

    #[error("Balance overflow for {asset}")]
    Overflow { asset: String },
}

/// Errors raised by a single venue adapter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VenueError {
    #[error("No {venue} pool for {asset_in} -> {asset_out}")]
    NoPool {
        venue: String,
        asset_in: String,
        asset_out: String,
    },

    #[error("Insufficient liquidity in {venue} pool {pool}")]
    NoLiquidity { venue: String, pool: String },

    #[error("Output below minimum: got {got}, need {min}")]
    InsufficientOutput { got: Amount, min: Amount },

    #[error("Transfer failed: {0}")]
    TransferFailure(#[from] LedgerError),
}

/// Path search and execution errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Hop bound {max_hop} outside {min}..={max}")]
    InvalidHopBound {
        max_hop: usize,
        min: usize,
        max: usize,
    },

    #[error("No path found from {asset_in} to {asset_out}")]
    NoPathFound { asset_in: String, asset_out: String },

    #[error("Input and output resolve to the same asset {asset}")]
    IdenticalAssets { asset: String },

    #[error("Invalid route: {reason}")]
    InvalidRoute { reason: String },

    #[error("Adapter not registered: {venue}")]
    UnknownAdapter { venue: String },

    #[error("Deadline {deadline} expired at {now}")]
    DeadlineExpired { deadline: Timestamp, now: Timestamp },

    #[error("Native value mismatch: expected {expected}, got {got}")]
    InvalidNativeValue { expected: Amount, got: Amount },

    #[error("Output below minimum: got {got}, need {min}")]
    InsufficientOutput { got: Amount, min: Amount },

    #[error("Hop {hop} via {venue} failed: {source}")]
    HopFailure {
        hop: usize,
        venue: String,
        #[source]
        source: VenueError,
    },

    #[error("Transfer failed: {0}")]
    TransferFailure(#[from] LedgerError),
}

/// Registry administration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminError {
    #[error("Caller {caller} is not the registry owner")]
    Unauthorized { caller: String },

    #[error("Adapter id registered twice: {venue}")]
    DuplicateAdapter { venue: String },

    #[error("Invalid venue id: {venue:?}")]
    InvalidVenueId { venue: String },

    #[error("Asset not registered: {asset}")]
    UnknownAsset { asset: String },
}

/// Result type alias for Waypoint operations
pub type Result<T> = std::result::Result<T, Error>;

impl VenueError {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoPool { .. } => "no_pool",
            Self::NoLiquidity { .. } => "no_liquidity",
            Self::InsufficientOutput { .. } => "insufficient_output",
            Self::TransferFailure(_) => "transfer_failure",
        }
    }
}

impl RouteError {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidHopBound { .. } => "invalid_hop_bound",
            Self::NoPathFound { .. } => "no_path_found",
            Self::IdenticalAssets { .. } => "identical_assets",
            Self::InvalidRoute { .. } => "invalid_route",
            Self::UnknownAdapter { .. } => "unknown_adapter",
            Self::DeadlineExpired { .. } => "deadline_expired",
            Self::InvalidNativeValue { .. } => "invalid_native_value",
            Self::InsufficientOutput { .. } => "insufficient_output",
            Self::HopFailure { .. } => "hop_failure",
            Self::TransferFailure(_) => "transfer_failure",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidHopBound { .. }
            | Self::IdenticalAssets { .. }
            | Self::InvalidRoute { .. }
            | Self::UnknownAdapter { .. }
            | Self::InvalidNativeValue { .. } => 400,
            Self::NoPathFound { .. } => 404,
            Self::DeadlineExpired { .. } => 408,
            Self::InsufficientOutput { .. } | Self::HopFailure { .. } => 422,
            Self::TransferFailure(_) => 422,
        }
    }
}

impl AdminError {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "unauthorized",
            Self::DuplicateAdapter { .. } => "duplicate_adapter",
            Self::InvalidVenueId { .. } => "invalid_venue_id",
            Self::UnknownAsset { .. } => "unknown_asset",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized { .. } => 403,
            Self::DuplicateAdapter { .. }
            | Self::InvalidVenueId { .. }
            | Self::UnknownAsset { .. } => 400,
        }
    }
}
