//! Cache Engine Module
//!
//! Main cache engine combining the admission-controlled store with TTL
//! tracking and a background reaper task.
//!
//! The TTL index is guarded by a reader-writer lock: lookups take the read
//! lock for the expiry check only, while set/delete/clear serialize on the
//! write lock. The store is internally thread-safe and needs no extra
//! locking; the lock exists solely to keep the index and the store's
//! effective contents consistent as observed through this API.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::index::TtlIndex;
use crate::cache::reaper::spawn_reaper_task;
use crate::cache::store::AdmissionStore;
use crate::cache::CacheStats;
use crate::config::CacheConfig;
use crate::error::ConfigError;

// == Shared State ==
/// State shared between the cache handle and its reaper task.
pub(crate) struct Shared<V> {
    /// Expiry timestamps for keys with a TTL
    ttls: RwLock<TtlIndex>,
    /// Cost-bounded storage backend
    store: AdmissionStore<V>,
}

impl<V> Shared<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub(crate) async fn get(&self, key: &str) -> Option<V> {
        let expiry = self.ttls.read().await.expiry(key);

        if let Some(expires_at) = expiry {
            if Instant::now() >= expires_at {
                // Lazy expiration: the entry is logically gone even though
                // the store may still hold it. The store is never consulted
                // on this path, so its hit/miss counters stay untouched.
                self.delete(key).await;
                return None;
            }
        }

        let value = self.store.get(key).await;
        if value.is_some() {
            debug!(key = %key, "cache hit");
        }
        value
    }

    pub(crate) async fn set(&self, key: String, value: V, ttl: Option<Duration>) {
        // The store decides admission on its own; nothing to wait for.
        self.store.insert(key.clone(), value).await;

        let mut ttls = self.ttls.write().await;
        match ttl {
            Some(ttl) if !ttl.is_zero() => {
                ttls.insert(key.clone(), Instant::now() + ttl);
            }
            // No TTL: drop any expiry left behind by a previous set, so the
            // key never expires.
            _ => {
                ttls.remove(&key);
            }
        }
        drop(ttls);

        debug!(key = %key, ttl = ?ttl, "cache set");
    }

    pub(crate) async fn delete(&self, key: &str) {
        // Both removals happen under the write lock, index entry first. A
        // concurrent get can therefore never observe the gap where the store
        // still holds the value but no expiry is tracked for it.
        let mut ttls = self.ttls.write().await;
        ttls.remove(key);
        self.store.remove(key).await;
        drop(ttls);

        debug!(key = %key, "cache delete");
    }

    pub(crate) async fn clear(&self) {
        let mut ttls = self.ttls.write().await;
        self.store.clear().await;
        ttls.clear();
        drop(ttls);

        info!("cache cleared");
    }

    pub(crate) async fn stats(&self) -> CacheStats {
        self.store.stats().await
    }

    /// Keys whose expiry is at or before `now`.
    pub(crate) async fn expired_keys(&self, now: Instant) -> Vec<String> {
        self.ttls.read().await.collect_expired(now)
    }

    pub(crate) async fn tracked_keys(&self) -> usize {
        self.ttls.read().await.len()
    }
}

// == Cache ==
/// In-memory cache with per-key TTL on top of an admission-controlled store.
///
/// Values are opaque to the cache: any `Clone + Send + Sync` type works, and
/// the cache never inspects value contents. Entry retention under cost
/// pressure is decided by the backing store, so a `set` is not guaranteed to
/// be reflected by a later `get` even before its TTL elapses.
///
/// A background reaper sweeps expired keys every `reap_interval`, so entries
/// that are never read again still get removed. [`Cache::close`] stops the
/// reaper and must be called at most once; issuing operations concurrently
/// with or after `close` is outside the usage contract.
pub struct Cache<V> {
    shared: Arc<Shared<V>>,
    shutdown: watch::Sender<bool>,
    reaper: Mutex<Option<JoinHandle<()>>>,
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a new cache and starts its reaper task.
    ///
    /// Fails without constructing anything if any sizing parameter in the
    /// configuration is not positive. Must be called within a Tokio runtime.
    pub fn new(config: CacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let shared = Arc::new(Shared {
            ttls: RwLock::new(TtlIndex::new()),
            store: AdmissionStore::new(&config),
        });

        let (shutdown, shutdown_rx) = watch::channel(false);
        let handle = spawn_reaper_task(Arc::clone(&shared), config.reap_interval, shutdown_rx);

        Ok(Self {
            shared,
            shutdown,
            reaper: Mutex::new(Some(handle)),
        })
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A key whose TTL has elapsed is removed and reported as absent, even
    /// if the reaper has not swept it yet.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.shared.get(key).await
    }

    // == Set ==
    /// Stores a value with an optional TTL.
    ///
    /// `None` or a zero duration means the entry never expires; a previous
    /// expiry for the key is discarded in that case. With a positive TTL the
    /// expiry is recorded fresh, overwriting any prior one.
    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        self.shared.set(key.into(), value, ttl).await;
    }

    // == Delete ==
    /// Removes a key and its expiry. Deleting an absent key is a no-op.
    pub async fn delete(&self, key: &str) {
        self.shared.delete(key).await;
    }

    // == Clear ==
    /// Removes every entry and every tracked expiry.
    pub async fn clear(&self) {
        self.shared.clear().await;
    }

    // == Stats ==
    /// Returns cumulative hit/miss counters and the current entry count.
    pub async fn stats(&self) -> CacheStats {
        self.shared.stats().await
    }

    // == Tracked Keys ==
    /// Number of keys currently holding a recorded expiry.
    pub async fn tracked_keys(&self) -> usize {
        self.shared.tracked_keys().await
    }

    // == Close ==
    /// Stops the reaper and waits until it has observed the shutdown signal.
    ///
    /// Part of the usage contract: call at most once, after all other
    /// operations have finished.
    pub async fn close(&self) {
        let _ = self.shutdown.send(true);

        if let Some(handle) = self.reaper.lock().await.take() {
            let _ = handle.await;
        }

        debug!("cache closed");
    }
}
