//! In-memory storage for the monitor

pub mod tx_cache;

pub use tx_cache::{CacheStats, TransactionCache, DEFAULT_CACHE_SIZE};
