//! Core type definitions for Waypoint

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

/// Raw asset amount in the asset's smallest unit (wei, satoshi, ...)
pub type Amount = u128;

/// Settlement clock in unix seconds
pub type Timestamp = u64;

/// Length of an account or asset identity in bytes
pub const ADDRESS_LEN: usize = 20;

/// Parse a `0x`-prefixed 20-byte hex identity into its canonical lowercase form.
fn canonicalize(raw: &str) -> Result<String, Error> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .ok_or_else(|| Error::InvalidAddress {
            address: raw.to_string(),
            reason: "missing 0x prefix".to_string(),
        })?;

    let bytes = hex::decode(body).map_err(|e| Error::InvalidAddress {
        address: raw.to_string(),
        reason: e.to_string(),
    })?;

    if bytes.len() != ADDRESS_LEN {
        return Err(Error::InvalidAddress {
            address: raw.to_string(),
            reason: format!("expected {} bytes, got {}", ADDRESS_LEN, bytes.len()),
        });
    }

    Ok(format!("0x{}", hex::encode(bytes)))
}

/// Account identity (20 bytes, hex-encoded, canonical lowercase)
///
/// Comparison is case-insensitive because every constructor canonicalizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(pub(crate) String);

impl Address {
    pub fn parse(raw: &str) -> Result<Self, Error> {
        canonicalize(raw).map(Self)
    }

    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Asset identity (20 bytes, hex-encoded, canonical lowercase)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetId(pub(crate) String);

impl AssetId {
    pub fn parse(raw: &str) -> Result<Self, Error> {
        canonicalize(raw).map(Self)
    }

    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(format!("0x{}", hex::encode(bytes)))
    }

    /// The sentinel identity standing for the chain-native asset.
    pub fn native() -> Self {
        Self(constants::NATIVE_ASSET_ADDRESS.to_string())
    }

    pub fn is_native(&self) -> bool {
        self.0 == constants::NATIVE_ASSET_ADDRESS
    }

    /// Boundary conversion: the native sentinel maps to its wrapped
    /// representation, every other asset maps to itself.
    pub fn to_wrapped(&self, wrapped_native: &AssetId) -> AssetId {
        if self.is_native() {
            wrapped_native.clone()
        } else {
            self.clone()
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AssetId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AssetId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AssetId> for String {
    fn from(value: AssetId) -> Self {
        value.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Venue identifier (e.g. "UNI-V2", "SUSHI", "CURVE")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VenueId(pub String);

impl VenueId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Ids must fit a 32-byte slot and be printable ASCII.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && self.0.len() <= constants::MAX_VENUE_ID_LEN
            && self.0.chars().all(|c| c.is_ascii_graphic())
    }
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registered asset metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub symbol: String,
    pub decimals: u8,
    #[serde(default)]
    pub is_native: bool,
}

impl Asset {
    pub fn new(id: AssetId, symbol: impl Into<String>, decimals: u8) -> Self {
        let is_native = id.is_native();
        Self {
            id,
            symbol: symbol.into(),
            decimals,
            is_native,
        }
    }

    pub fn native(symbol: impl Into<String>, decimals: u8) -> Self {
        Self::new(AssetId::native(), symbol, decimals)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol, self.id)
    }
}

/// Constants
pub mod constants {
    /// Sentinel address of the chain-native asset
    pub const NATIVE_ASSET_ADDRESS: &str = "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee";

    /// Canonical wrapped-native asset (WETH on mainnet)
    pub const DEFAULT_WRAPPED_NATIVE: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";

    /// Venue ids are stored in a 32-byte slot
    pub const MAX_VENUE_ID_LEN: usize = 32;

    /// Smallest accepted hop bound
    pub const MIN_HOP: usize = 1;

    /// Largest accepted hop bound
    pub const MAX_HOP: usize = 4;

    /// Basis-point denominator for slippage settings
    pub const BPS_DENOMINATOR: u32 = 10_000;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id_case_insensitive() {
        let upper = AssetId::parse("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2").unwrap();
        let lower = AssetId::parse("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.as_str(), constants::DEFAULT_WRAPPED_NATIVE);
    }

    #[test]
    fn test_asset_id_rejects_malformed() {
        assert!(AssetId::parse("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2").is_err());
        assert!(AssetId::parse("0x1234").is_err());
        assert!(AssetId::parse("0xzz2aaa39b223fe8d0a0e5c4f27ead9083c756cc2").is_err());
    }

    #[test]
    fn test_native_sentinel() {
        let native = AssetId::parse("0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE").unwrap();
        assert!(native.is_native());
        assert_eq!(native, AssetId::native());

        let weth = AssetId::parse(constants::DEFAULT_WRAPPED_NATIVE).unwrap();
        assert_eq!(native.to_wrapped(&weth), weth);
        assert_eq!(weth.to_wrapped(&weth), weth);
    }

    #[test]
    fn test_ordering_follows_canonical_form() {
        let a = AssetId::from_bytes([0x0a; ADDRESS_LEN]);
        let b = AssetId::parse("0x0B0B0B0B0B0B0B0B0B0B0B0B0B0B0B0B0B0B0B0B").unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_serde_canonicalizes() {
        let parsed: AssetId =
            serde_json::from_str("\"0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2\"").unwrap();
        assert_eq!(parsed.as_str(), constants::DEFAULT_WRAPPED_NATIVE);
        assert!(serde_json::from_str::<AssetId>("\"0xnothex\"").is_err());
    }

    #[test]
    fn test_venue_id_validation() {
        assert!(VenueId::new("UNI-V2").is_valid());
        assert!(!VenueId::new("").is_valid());
        assert!(!VenueId::new("x".repeat(33)).is_valid());
        assert!(!VenueId::new("has space").is_valid());
    }
}
