//! Store Adapter Module
//!
//! Thin wrapper around the Moka concurrent cache, which owns admission and
//! eviction. The adapter adds the hit/miss counters Moka does not track and
//! charges every entry a flat cost against the configured budget.

use std::sync::atomic::{AtomicU64, Ordering};

use moka::future::Cache as MokaCache;

use crate::cache::CacheStats;
use crate::config::CacheConfig;

/// Cost charged against the budget for every entry, regardless of its actual
/// size. Matches the store's byte-scaled budget only approximately.
const ENTRY_COST: u32 = 64;

// == Admission Store ==
/// Concurrent, cost-bounded storage backend.
///
/// Entry lifetime is governed entirely by Moka's TinyLFU policy: an insert
/// may be silently dropped or evict other entries once the aggregate cost
/// exceeds the budget. Callers must tolerate an insert that is never
/// reflected in a later lookup.
pub(crate) struct AdmissionStore<V> {
    entries: MokaCache<String, V>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V> AdmissionStore<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Builds the store from validated sizing parameters.
    ///
    /// `max_cost` bounds the aggregate entry cost. Moka sizes its frequency
    /// sketch and write buffers internally, so `num_counters` and
    /// `buffer_items` only gate construction.
    pub(crate) fn new(config: &CacheConfig) -> Self {
        let entries = MokaCache::builder()
            .max_capacity(config.max_cost as u64)
            .weigher(|_key: &String, _value: &V| ENTRY_COST)
            .build();

        Self {
            entries,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    // == Get ==
    /// Looks up a key, recording a hit or miss.
    pub(crate) async fn get(&self, key: &str) -> Option<V> {
        match self.entries.get(key).await {
            Some(value) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(value)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    // == Insert ==
    /// Submits an entry to the store. Fire-and-forget: admission is decided
    /// by the store, never surfaced to the caller.
    pub(crate) async fn insert(&self, key: String, value: V) {
        self.entries.insert(key, value).await;
    }

    // == Remove ==
    /// Invalidates a key. Removing an absent key is a no-op.
    pub(crate) async fn remove(&self, key: &str) {
        self.entries.invalidate(key).await;
    }

    // == Clear ==
    /// Invalidates every entry.
    pub(crate) async fn clear(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks().await;
    }

    // == Stats ==
    /// Returns cumulative hit/miss counters and the current entry count.
    pub(crate) async fn stats(&self) -> CacheStats {
        // Entry counts lag behind writes until pending maintenance runs.
        self.entries.run_pending_tasks().await;

        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.entry_count(),
        }
    }
}
