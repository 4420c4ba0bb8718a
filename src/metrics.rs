//! Server Metrics Module
//!
//! Tracks server usage with atomic counters that are safe to increment from
//! any handler concurrently. A snapshot copies the values out so readers
//! never observe torn state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::Serialize;

// == Server Metrics ==
/// Cumulative request counters plus server start time.
#[derive(Debug)]
pub struct ServerMetrics {
    started_at: Instant,
    gets: AtomicU64,
    sets: AtomicU64,
    deletes: AtomicU64,
    clears: AtomicU64,
    errors: AtomicU64,
}

/// Point-in-time copy of the server metrics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Seconds since the server started
    pub uptime_secs: u64,
    /// GET requests served
    pub gets: u64,
    /// SET requests served
    pub sets: u64,
    /// DELETE requests served
    pub deletes: u64,
    /// CLEAR requests served
    pub clears: u64,
    /// Requests rejected as invalid
    pub errors: u64,
}

impl ServerMetrics {
    /// Creates a new metrics instance with all counters at zero.
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            gets: AtomicU64::new(0),
            sets: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
            clears: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    pub fn record_get(&self) {
        self.gets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_set(&self) {
        self.sets.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_clear(&self) {
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    /// Copies the current counter values into a snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_secs: self.started_at.elapsed().as_secs(),
            gets: self.gets.load(Ordering::Relaxed),
            sets: self.sets.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self::new()
    }
}
