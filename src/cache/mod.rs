//! Cache Module
//!
//! In-memory caching with TTL expiration, capacity eviction and atomic
//! entry processing. The entry-processor machinery (cell, snapshot,
//! mutable entry, executor) collapses an arbitrary sequence of reads and
//! writes against one entry into a single terminal action.

mod cell;
mod entry;
mod mutable;
mod processor;
mod snapshot;
mod stats;
mod store;
mod tracker;


// Re-export public types
pub use cell::{FailureCause, ValueOrFailure};
pub use entry::{current_timestamp_ms, CacheEntry};
pub use mutable::{MutableEntry, MutationExecutor};
pub use processor::CacheLoader;
pub use snapshot::{EntrySnapshot, SnapshotOrigin};
pub use stats::CacheStats;
pub use store::{CacheStore, StoreExecutor};
pub use tracker::AccessTracker;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
