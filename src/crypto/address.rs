//! Script hashes and display addresses
//!
//! A [`UInt160`] is the 20-byte identity of a contract or an account. It is
//! shown to humans either as a `0x`-prefixed big-endian hex string or as a
//! Base58Check address.

use crate::crypto::hash::{double_sha256, hash160};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Version byte prepended to a script hash before Base58Check encoding
pub const ADDRESS_VERSION: u8 = 0x17;

/// Size of a script hash in bytes
pub const UINT160_SIZE: usize = 20;

/// Errors that can occur while parsing hashes and addresses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid length: expected 20 bytes, got {0}")]
    InvalidLength(usize),
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
    #[error("Invalid base58: {0}")]
    InvalidBase58(String),
    #[error("Wrong address version: 0x{0:02x}")]
    WrongVersion(u8),
    #[error("Checksum mismatch")]
    ChecksumMismatch,
}

/// A 20-byte script hash, stored in script (little-endian) byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct UInt160([u8; UINT160_SIZE]);

impl UInt160 {
    pub const fn new(bytes: [u8; UINT160_SIZE]) -> Self {
        Self(bytes)
    }

    /// Build from a slice that must be exactly 20 bytes long
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        let array: [u8; UINT160_SIZE] = bytes
            .try_into()
            .map_err(|_| AddressError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }

    /// Script hash of a contract's bytecode
    pub fn from_script(script: &[u8]) -> Self {
        Self(hash160(script))
    }

    pub fn as_bytes(&self) -> &[u8; UINT160_SIZE] {
        &self.0
    }

    /// Base58Check display address
    pub fn to_address(&self) -> String {
        let mut address_bytes = Vec::with_capacity(1 + UINT160_SIZE + 4);
        address_bytes.push(ADDRESS_VERSION);
        address_bytes.extend_from_slice(&self.0);

        let checksum = double_sha256(&address_bytes);
        address_bytes.extend_from_slice(&checksum[..4]);

        bs58::encode(address_bytes).into_string()
    }

    /// Parse a Base58Check display address back into its script hash
    pub fn from_address(address: &str) -> Result<Self, AddressError> {
        let bytes = bs58::decode(address)
            .into_vec()
            .map_err(|e| AddressError::InvalidBase58(e.to_string()))?;
        if bytes.len() != 1 + UINT160_SIZE + 4 {
            return Err(AddressError::InvalidLength(bytes.len()));
        }
        if bytes[0] != ADDRESS_VERSION {
            return Err(AddressError::WrongVersion(bytes[0]));
        }

        let (payload, checksum) = bytes.split_at(1 + UINT160_SIZE);
        if double_sha256(payload)[..4] != *checksum {
            return Err(AddressError::ChecksumMismatch);
        }
        Self::from_slice(&payload[1..])
    }
}

impl From<[u8; UINT160_SIZE]> for UInt160 {
    fn from(bytes: [u8; UINT160_SIZE]) -> Self {
        Self(bytes)
    }
}

/// Big-endian hex, the order block explorers print script hashes in.
impl fmt::Display for UInt160 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut reversed = self.0;
        reversed.reverse();
        write!(f, "0x{}", hex::encode(reversed))
    }
}

impl FromStr for UInt160 {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = hex::decode(digits).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        bytes.reverse();
        Self::from_slice(&bytes)
    }
}

impl Serialize for UInt160 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for UInt160 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
