//! Access Tracker Module
//!
//! Tracks recency of key accesses for capacity eviction. Each touch stamps
//! the key with a monotonically increasing logical clock; the eviction
//! candidate is the key with the smallest stamp.

use std::collections::HashMap;

// == Access Tracker ==
/// Recency tracking via a logical access clock.
#[derive(Debug, Default)]
pub struct AccessTracker {
    /// Monotonic counter, incremented on every touch
    clock: u64,
    /// Last access stamp per key
    stamps: HashMap<String, u64>,
}

impl AccessTracker {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used.
    pub fn touch(&mut self, key: &str) {
        self.clock += 1;
        self.stamps.insert(key.to_string(), self.clock);
    }

    // == Forget ==
    /// Drops a key from tracking.
    pub fn forget(&mut self, key: &str) {
        self.stamps.remove(key);
    }

    // == Take Oldest ==
    /// Removes and returns the least recently used key, or None if empty.
    pub fn take_oldest(&mut self) -> Option<String> {
        let key = self
            .stamps
            .iter()
            .min_by_key(|(_, stamp)| **stamp)
            .map(|(key, _)| key.clone())?;
        self.stamps.remove(&key);
        Some(key)
    }

    // == Peek Oldest ==
    /// Returns the least recently used key without removing it.
    pub fn peek_oldest(&self) -> Option<&String> {
        self.stamps
            .iter()
            .min_by_key(|(_, stamp)| **stamp)
            .map(|(key, _)| key)
    }

    // == Length ==
    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    #[allow(dead_code)]
    pub fn contains(&self, key: &str) -> bool {
        self.stamps.contains_key(key)
    }
}
