//! Cache Entry Module
//!
//! Defines the structure for stored cache entries. The payload is a
//! value-or-failure cell: a loader or entry processor may have stored a
//! failure in place of a value, and that failure stays a cached result
//! until it expires or is overwritten.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::cache::cell::ValueOrFailure;

// == Cache Entry ==
/// A single stored entry with TTL metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored result (value or carried failure)
    pub value: ValueOrFailure<String>,
    /// Creation timestamp (Unix milliseconds); doubles as the last
    /// modification time since overwrites create a new entry
    pub created_at: u64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry holding a cell, with an optional TTL in seconds.
    ///
    /// The expiry computation saturates, so an absurdly large TTL clamps to
    /// "effectively never expires" instead of wrapping around.
    pub fn new(value: ValueOrFailure<String>, ttl_seconds: Option<u64>) -> Self {
        let now = current_timestamp_ms();
        let expires_at = ttl_seconds.map(|ttl| now.saturating_add(ttl.saturating_mul(1000)));

        Self {
            value,
            created_at: now,
            expires_at,
        }
    }

    /// Creates a new entry with an absolute expiry timestamp, as requested
    /// through an entry processor's expiry override.
    pub fn with_expiry_at(value: ValueOrFailure<String>, expires_at: u64) -> Self {
        Self {
            value,
            created_at: current_timestamp_ms(),
            expires_at: Some(expires_at),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once the current time is
    /// greater than or equal to the expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if no expiration is
    /// set. Expired entries report `Some(0)`.
    pub fn ttl_remaining_ms(&self) -> Option<u64> {
        self.expires_at.map(|expires| {
            let now = current_timestamp_ms();
            expires.saturating_sub(now)
        })
    }

    /// Returns remaining TTL in whole seconds, for API responses.
    pub fn ttl_remaining(&self) -> Option<u64> {
        self.ttl_remaining_ms().map(|ms| ms / 1000)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}
