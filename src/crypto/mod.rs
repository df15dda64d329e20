//! Cryptographic utilities
//!
//! This module provides:
//! - SHA-256 and HASH160 digests
//! - 20-byte script hashes and their Base58Check display addresses

pub mod address;
pub mod hash;

pub use address::{AddressError, UInt160, ADDRESS_VERSION, UINT160_SIZE};
pub use hash::{double_sha256, hash160, sha256, sha256_hex};
