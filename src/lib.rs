//! Hypercache - A lightweight in-memory cache server
//!
//! Layers per-key TTL expiration over an admission-controlled, cost-bounded
//! concurrent store, with a background reaper and an HTTP API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;

pub use api::AppState;
pub use cache::{Cache, CacheStats};
pub use config::{CacheConfig, Config};
pub use error::{CacheError, ConfigError};
