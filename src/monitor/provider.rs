//! Chain access
//!
//! The monitor reads the chain through [`ChainProvider`]. Calls have no
//! timeout of their own; implementations own their timeout and retry policy.

use crate::core::{Block, Transaction};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::future::Future;
use std::io;
use std::path::Path;
use thiserror::Error;
use tokio::sync::RwLock;

/// Chain access errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Read access to a chain
pub trait ChainProvider {
    /// Height of the newest block
    fn get_block_height(&self) -> impl Future<Output = Result<u64, ProviderError>> + Send;

    /// Block at `height`, or `None` if the provider does not have it
    fn get_block(
        &self,
        height: u64,
    ) -> impl Future<Output = Result<Option<Block>, ProviderError>> + Send;

    /// Transaction by hash, or `None` if unknown
    fn get_transaction(
        &self,
        hash: &str,
    ) -> impl Future<Output = Result<Option<Transaction>, ProviderError>> + Send;
}

/// On-disk chain fixture format
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChainFixture {
    pub blocks: Vec<Block>,
}

/// A chain held in memory, keyed by height
#[derive(Debug, Default)]
pub struct MemoryChain {
    blocks: RwLock<BTreeMap<u64, Block>>,
}

impl MemoryChain {
    /// Create an empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chain from blocks; later blocks replace earlier ones at the same height
    pub fn from_blocks(blocks: impl IntoIterator<Item = Block>) -> Self {
        let blocks = blocks.into_iter().map(|b| (b.index, b)).collect();
        Self {
            blocks: RwLock::new(blocks),
        }
    }

    /// Load a JSON [`ChainFixture`] from disk
    pub fn load(path: &Path) -> Result<Self, ProviderError> {
        let data = fs::read_to_string(path)?;
        let fixture: ChainFixture = serde_json::from_str(&data)?;
        log::info!(
            "Loaded {} blocks from {}",
            fixture.blocks.len(),
            path.display()
        );
        Ok(Self::from_blocks(fixture.blocks))
    }

    /// Append or replace a block
    pub async fn push_block(&self, block: Block) {
        self.blocks.write().await.insert(block.index, block);
    }
}

impl ChainProvider for MemoryChain {
    async fn get_block_height(&self) -> Result<u64, ProviderError> {
        let blocks = self.blocks.read().await;
        Ok(blocks.keys().next_back().copied().unwrap_or(0))
    }

    async fn get_block(&self, height: u64) -> Result<Option<Block>, ProviderError> {
        Ok(self.blocks.read().await.get(&height).cloned())
    }

    async fn get_transaction(&self, hash: &str) -> Result<Option<Transaction>, ProviderError> {
        let blocks = self.blocks.read().await;
        Ok(blocks
            .values()
            .flat_map(|b| b.transactions.iter())
            .find(|tx| tx.hash == hash)
            .cloned())
    }
}
