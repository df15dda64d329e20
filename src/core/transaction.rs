//! Transactions as seen by the monitor
//!
//! Only invocation transactions carry a script worth scanning; every other
//! kind is kept so blocks round-trip faithfully.

use crate::crypto::double_sha256;
use serde::{Deserialize, Serialize};

/// NEO 2 transaction types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[repr(u8)]
pub enum TransactionKind {
    #[serde(alias = "MinerTransaction")]
    Miner = 0x00,
    #[serde(alias = "IssueTransaction")]
    Issue = 0x01,
    #[serde(alias = "ClaimTransaction")]
    Claim = 0x02,
    #[serde(alias = "EnrollmentTransaction")]
    Enrollment = 0x20,
    #[serde(alias = "RegisterTransaction")]
    Register = 0x40,
    #[serde(alias = "ContractTransaction")]
    Contract = 0x80,
    #[serde(alias = "StateTransaction")]
    State = 0x90,
    #[serde(alias = "PublishTransaction")]
    Publish = 0xd0,
    #[serde(alias = "InvocationTransaction")]
    Invocation = 0xd1,
}

/// A transaction inside a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID (hex)
    pub hash: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Invocation script; empty for non-invocation kinds
    #[serde(with = "hex::serde", default)]
    pub script: Vec<u8>,
}

impl Transaction {
    /// Create a transaction, deriving its ID from kind and script
    pub fn new(kind: TransactionKind, script: Vec<u8>) -> Self {
        let hash = Self::calculate_hash(kind, &script);
        Self { hash, kind, script }
    }

    /// Create an invocation transaction running `script`
    pub fn invocation(script: Vec<u8>) -> Self {
        Self::new(TransactionKind::Invocation, script)
    }

    /// Whether this transaction runs a script
    pub fn is_invocation(&self) -> bool {
        self.kind == TransactionKind::Invocation
    }

    /// Double SHA-256 over the kind byte and script, shown big-endian
    fn calculate_hash(kind: TransactionKind, script: &[u8]) -> String {
        let mut data = Vec::with_capacity(1 + script.len());
        data.push(kind as u8);
        data.extend_from_slice(script);
        let mut hash = double_sha256(&data);
        hash.reverse();
        hex::encode(hash)
    }
}
