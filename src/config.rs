//! Configuration Module
//!
//! Handles cache sizing parameters and server configuration loaded from
//! environment variables.

use std::env;
use std::time::Duration;

use crate::error::ConfigError;

// == Cache Config ==
/// Sizing parameters for the cache and its backing store.
///
/// The three sizing fields mirror the store's admission model: a total cost
/// budget, the number of access-frequency counters, and the internal buffer
/// size. All three must be positive; [`CacheConfig::validate`] is called
/// before any store is constructed.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum aggregate cost of cache entries (in bytes, approximately)
    pub max_cost: i64,
    /// Number of keys to track access frequency for
    pub num_counters: i64,
    /// Size of the store's internal buffers
    pub buffer_items: i64,
    /// Interval between background reaper sweeps
    pub reap_interval: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_cost: 100 * 1024 * 1024, // 100 MiB
            num_counters: 1_000_000,
            buffer_items: 64,
            reap_interval: Duration::from_secs(30),
        }
    }
}

impl CacheConfig {
    /// Checks that every sizing field is positive.
    ///
    /// Returns the error for the first offending field; construction of the
    /// cache fails atomically when any check fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cost <= 0 {
            return Err(ConfigError::InvalidMaxCost);
        }
        if self.num_counters <= 0 {
            return Err(ConfigError::InvalidNumCounters);
        }
        if self.buffer_items <= 0 {
            return Err(ConfigError::InvalidBufferItems);
        }
        Ok(())
    }
}

// == Server Config ==
/// Full server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache sizing parameters
    pub cache: CacheConfig,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_COST` - Maximum aggregate entry cost in bytes (default: 104857600)
    /// - `NUM_COUNTERS` - Frequency counters to keep (default: 1000000)
    /// - `BUFFER_ITEMS` - Store buffer size (default: 64)
    /// - `REAP_INTERVAL` - Seconds between reaper sweeps (default: 30)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = CacheConfig::default();

        Self {
            cache: CacheConfig {
                max_cost: env::var("MAX_COST")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.max_cost),
                num_counters: env::var("NUM_COUNTERS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.num_counters),
                buffer_items: env::var("BUFFER_ITEMS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.buffer_items),
                reap_interval: env::var("REAP_INTERVAL")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.reap_interval),
            },
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            server_port: 3000,
        }
    }
}
