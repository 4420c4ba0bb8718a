//! TTL Index Module
//!
//! Mapping from key to expiry instant. Only keys stored with a positive TTL
//! are present; a key absent from the index never expires.

use std::collections::HashMap;
use std::time::Instant;

// == TTL Index ==
/// Tracks expiry timestamps for keys with a time-to-live.
///
/// The index holds no lock of its own; the cache guards it with a
/// reader-writer lock and keeps exactly one entry per key.
#[derive(Debug, Default)]
pub struct TtlIndex {
    expirations: HashMap<String, Instant>,
}

impl TtlIndex {
    // == Constructor ==
    /// Creates a new empty index.
    pub fn new() -> Self {
        Self {
            expirations: HashMap::new(),
        }
    }

    // == Insert ==
    /// Records the expiry instant for a key, overwriting any prior expiry.
    pub fn insert(&mut self, key: String, expires_at: Instant) {
        self.expirations.insert(key, expires_at);
    }

    // == Remove ==
    /// Removes a key from the index. Returns true if an entry was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.expirations.remove(key).is_some()
    }

    // == Clear ==
    /// Drops every tracked expiry.
    pub fn clear(&mut self) {
        self.expirations.clear();
    }

    // == Expiry ==
    /// Returns the recorded expiry instant for a key, if any.
    pub fn expiry(&self, key: &str) -> Option<Instant> {
        self.expirations.get(key).copied()
    }

    // == Collect Expired ==
    /// Collects every key whose expiry is at or before `now`.
    ///
    /// Boundary condition: a key expiring exactly at `now` is already
    /// expired, so a TTL that has fully elapsed takes effect immediately.
    pub fn collect_expired(&self, now: Instant) -> Vec<String> {
        self.expirations
            .iter()
            .filter(|(_, expires_at)| **expires_at <= now)
            .map(|(key, _)| key.clone())
            .collect()
    }

    // == Length ==
    /// Returns the number of keys with a recorded expiry.
    pub fn len(&self) -> usize {
        self.expirations.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.expirations.is_empty()
    }
}
