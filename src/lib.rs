//! Atomcache - An in-memory cache server with atomic entry processing
//!
//! Provides TTL expiration, LRU-style eviction and an entry-processor API:
//! user logic runs against a mutable view of one entry and all its reads
//! and writes collapse into a single committed mutation.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
