//! Block implementation
//!
//! Blocks are fetched by height and assumed final once observed.

use crate::core::transaction::Transaction;
use crate::crypto::double_sha256;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A block in the chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Block index/height
    pub index: u64,
    /// Block hash (hex)
    pub hash: String,
    /// Hash of the previous block
    #[serde(default)]
    pub previous_hash: String,
    /// Block creation timestamp
    pub timestamp: DateTime<Utc>,
    /// List of transactions in the block
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Create a new block
    pub fn new(index: u64, previous_hash: String, transactions: Vec<Transaction>) -> Self {
        let timestamp = Utc::now();
        let hash = Self::calculate_hash(index, &previous_hash, &timestamp, &transactions);
        Self {
            index,
            hash,
            previous_hash,
            timestamp,
            transactions,
        }
    }

    fn calculate_hash(
        index: u64,
        previous_hash: &str,
        timestamp: &DateTime<Utc>,
        transactions: &[Transaction],
    ) -> String {
        let tx_hashes: Vec<&str> = transactions.iter().map(|tx| tx.hash.as_str()).collect();
        let data = format!(
            "{}{}{}{}",
            index,
            previous_hash,
            timestamp.timestamp(),
            tx_hashes.concat()
        );
        hex::encode(double_sha256(data.as_bytes()))
    }

    /// Number of transactions in the block
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Invocation transactions, in block order
    pub fn invocations(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|tx| tx.is_invocation())
    }
}
