//! Transaction cache
//!
//! Keeps recently seen transactions by hash so on-demand lookups can skip the
//! chain provider. Filled on lookup misses and from every block the monitor
//! scans; evicts least recently used entries once full.

use crate::core::Transaction;
use std::collections::{HashMap, VecDeque};

// =============================================================================
// Constants
// =============================================================================

/// Default maximum cache entries
pub const DEFAULT_CACHE_SIZE: usize = 10_000;

// =============================================================================
// Transaction Cache
// =============================================================================

/// Bounded transaction cache with LRU eviction
#[derive(Debug)]
pub struct TransactionCache {
    /// Cached transactions by hash
    entries: HashMap<String, Transaction>,
    /// LRU order (front = most recently used)
    lru_order: VecDeque<String>,
    /// Maximum cache size
    max_size: usize,
    /// Cache statistics
    stats: CacheStats,
}

impl TransactionCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_SIZE)
    }

    pub fn with_capacity(max_size: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(max_size.min(DEFAULT_CACHE_SIZE)),
            lru_order: VecDeque::new(),
            max_size: max_size.max(1),
            stats: CacheStats::default(),
        }
    }

    /// Get a transaction from cache
    pub fn get(&mut self, hash: &str) -> Option<Transaction> {
        let result = self.entries.get(hash).cloned();

        if result.is_some() {
            self.stats.hits += 1;
            self.touch_lru(hash);
        } else {
            self.stats.misses += 1;
        }

        result
    }

    /// Insert a transaction, replacing any entry with the same hash
    pub fn insert(&mut self, tx: Transaction) {
        let key = tx.hash.clone();

        if self.entries.contains_key(&key) {
            self.touch_lru(&key);
        } else {
            if self.entries.len() >= self.max_size {
                self.evict_one();
            }
            self.lru_order.push_front(key.clone());
        }

        self.entries.insert(key, tx);
        self.stats.inserts += 1;
    }

    /// Check if a transaction is cached
    pub fn contains(&self, hash: &str) -> bool {
        self.entries.contains_key(hash)
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get cache size
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Private helper methods

    fn touch_lru(&mut self, key: &str) {
        // Remove from current position
        self.lru_order.retain(|k| k != key);
        // Add to front
        self.lru_order.push_front(key.to_string());
    }

    fn evict_one(&mut self) {
        // Evict least recently used (from back)
        if let Some(key) = self.lru_order.pop_back() {
            if self.entries.remove(&key).is_some() {
                self.stats.evictions += 1;
            }
        }
    }
}

impl Default for TransactionCache {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Cache Statistics
// =============================================================================

/// Cache performance statistics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
