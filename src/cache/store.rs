//! Cache Store Module
//!
//! Main cache engine: HashMap storage with recency tracking, TTL expiration
//! and the entry-processor invocation loop. All entry-processor mutations
//! flow through [`CacheStore::process_entry`], which runs user logic
//! against a mutable entry view and applies the single terminal action the
//! invocation collapses into.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::cache::cell::{FailureCause, ValueOrFailure};
use crate::cache::entry::current_timestamp_ms;
use crate::cache::mutable::{MutableEntry, MutationExecutor};
use crate::cache::processor::CacheLoader;
use crate::cache::snapshot::EntrySnapshot;
use crate::cache::{AccessTracker, CacheEntry, CacheStats, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::{CacheError, ProcessingError, Result};

/// One load restart per invocation: after the load the entry is present
/// for the retried pass, so the restart condition cannot trigger again.
const MAX_LOAD_RESTARTS: usize = 1;

// == Cache Store ==
/// Main cache storage with capacity eviction, TTL support and atomic entry
/// processing.
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Recency tracker for capacity eviction
    tracker: AccessTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Default TTL in seconds for entries without explicit TTL
    default_ttl: u64,
    /// Read-through loader; when set, processor misses trigger a load
    loader: Option<Arc<dyn CacheLoader>>,
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore")
            .field("entries", &self.entries.len())
            .field("max_entries", &self.max_entries)
            .field("default_ttl", &self.default_ttl)
            .field("read_through", &self.loader.is_some())
            .finish()
    }
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    pub fn new(max_entries: usize, default_ttl: u64) -> Self {
        Self {
            entries: HashMap::new(),
            tracker: AccessTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            default_ttl,
            loader: None,
        }
    }

    /// Configures a read-through loader. Entry processors reading a miss
    /// will then restart after loading the value.
    pub fn with_loader(mut self, loader: Arc<dyn CacheLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Whether a read-through loader is configured.
    pub fn is_read_through(&self) -> bool {
        self.loader.is_some()
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// An existing entry is overwritten and its TTL reset. At capacity the
    /// least recently used entry is evicted first.
    pub fn set(&mut self, key: String, value: String, ttl: Option<u64>) -> Result<()> {
        let effective_ttl = Some(ttl.unwrap_or(self.default_ttl));
        let entry = CacheEntry::new(ValueOrFailure::Value(value), effective_ttl);
        self.insert_entry(&key, entry)
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// Expired entries are removed and counted as misses. An entry holding
    /// a stored failure counts as a hit but surfaces the failure with key
    /// context attached.
    pub fn get(&mut self, key: &str) -> Result<String> {
        if let Some(entry) = self.entries.get(key) {
            if entry.is_expired() {
                self.entries.remove(key);
                self.tracker.forget(key);
                self.stats.set_total_entries(self.entries.len());
                self.stats.record_miss();
                return Err(CacheError::Expired(key.to_string()));
            }

            self.stats.record_hit();
            self.tracker.touch(key);
            match &self.entries[key].value {
                ValueOrFailure::Value(v) => Ok(v.clone()),
                ValueOrFailure::Failure(cause) => Err(Self::stored_failure(key, cause)),
            }
        } else {
            self.stats.record_miss();
            Err(CacheError::NotFound(key.to_string()))
        }
    }

    // == Get Or Load ==
    /// Retrieves a value through the entry-processor machinery, so a miss
    /// triggers the configured loader before giving up.
    pub fn get_or_load(&mut self, key: &str) -> Result<String> {
        self.process_entry(key, |entry| match entry.value()? {
            Some(v) => Ok(v.clone()),
            None => Err(ProcessingError::Cache(CacheError::NotFound(
                entry.key().clone(),
            ))),
        })
    }

    // == Increment ==
    /// Atomically adds `delta` to the integer value stored under `key`.
    ///
    /// Runs as one entry-processor invocation: read, parse, add, write
    /// back. A missing entry starts from zero (or from the loaded value if
    /// a read-through loader is configured).
    pub fn increment(&mut self, key: &str, delta: i64) -> Result<i64> {
        self.process_entry(key, |entry| {
            let current = match entry.value()? {
                Some(raw) => raw.parse::<i64>().map_err(|_| {
                    ProcessingError::Cache(CacheError::InvalidRequest(format!(
                        "Value for key '{}' is not an integer",
                        entry.key()
                    )))
                })?,
                None => 0,
            };
            let next = current.checked_add(delta).ok_or_else(|| {
                ProcessingError::Cache(CacheError::InvalidRequest(
                    "Counter overflow".to_string(),
                ))
            })?;
            entry.set_value(next.to_string());
            Ok(next)
        })
    }

    // == Process Entry ==
    /// Runs user entry-processing logic against one entry.
    ///
    /// The closure sees a [`MutableEntry`] view: it may read the current
    /// value, overwrite it, store a failure, delete the entry or adjust its
    /// expiry, in any order. When the closure returns `Ok`, the accumulated
    /// intent is committed as a single terminal action. When it returns an
    /// error, nothing is committed.
    ///
    /// If the closure reads a missing value while a loader is configured,
    /// the invocation restarts once after the load: a successful load is
    /// installed with the default TTL, a failed load is presented to the
    /// retried closure as a stored failure without touching the store.
    pub fn process_entry<R, F>(&mut self, key: &str, mut processor: F) -> Result<R>
    where
        F: FnMut(
            &mut MutableEntry<'_, String, String, StoreExecutor<'_>>,
        ) -> std::result::Result<R, ProcessingError>,
    {
        let read_through = self.loader.is_some();
        let mut loaded: Option<ValueOrFailure<String>> = None;
        let mut restarts = 0;

        loop {
            let snapshot = self.snapshot_for(key, loaded.as_ref());
            let outcome = {
                let mut executor = StoreExecutor {
                    store: &mut *self,
                    key,
                    loaded: loaded.is_some(),
                };
                let mut entry = MutableEntry::new(&mut executor, &snapshot, read_through);
                match processor(&mut entry) {
                    Ok(result) => {
                        entry.commit();
                        Ok(result)
                    }
                    // No commit: a failed invocation emits no terminal action.
                    Err(err) => Err(err),
                }
            };

            match outcome {
                Ok(result) => return Ok(result),
                Err(ProcessingError::Cache(err)) => return Err(err),
                Err(ProcessingError::NeedsLoadRestart) => {
                    let loader = self.loader.clone().ok_or_else(|| {
                        CacheError::Internal(
                            "load restart signaled without a configured loader".to_string(),
                        )
                    })?;
                    if restarts >= MAX_LOAD_RESTARTS {
                        return Err(CacheError::Internal(format!(
                            "entry processing for '{key}' exceeded the load restart bound"
                        )));
                    }
                    restarts += 1;

                    match loader.load(key) {
                        Ok(value) => {
                            self.stats.record_load(false);
                            let entry = CacheEntry::new(
                                ValueOrFailure::Value(value.clone()),
                                Some(self.default_ttl),
                            );
                            self.insert_entry(key, entry)?;
                            loaded = Some(ValueOrFailure::Value(value));
                        }
                        Err(err) => {
                            self.stats.record_load(true);
                            loaded = Some(ValueOrFailure::failure(err));
                        }
                    }
                }
            }
        }
    }

    // == Delete ==
    /// Removes an entry by key.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.tracker.forget(key);
            self.stats.set_total_entries(self.entries.len());
            Ok(())
        } else {
            Err(CacheError::NotFound(key.to_string()))
        }
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
            self.tracker.forget(&key);
        }

        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Internal Helpers ==
    /// Inserts an entry, evicting the least recently used one when at
    /// capacity with a new key.
    ///
    /// Size limits are enforced here so every write path is covered: plain
    /// sets, committed processor mutations and read-through load installs.
    fn insert_entry(&mut self, key: &str, entry: CacheEntry) -> Result<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidRequest(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if let Some(value) = entry.value.value() {
            if value.len() > MAX_VALUE_SIZE {
                return Err(CacheError::InvalidRequest(format!(
                    "Value exceeds maximum size of {} bytes",
                    MAX_VALUE_SIZE
                )));
            }
        }

        let is_overwrite = self.entries.contains_key(key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            if let Some(evicted_key) = self.tracker.take_oldest() {
                self.entries.remove(&evicted_key);
                self.stats.record_eviction();
            } else {
                return Err(CacheError::CacheFull(
                    "Cache is full and eviction failed".to_string(),
                ));
            }
        }

        self.entries.insert(key.to_string(), entry);
        self.tracker.touch(key);
        self.stats.set_total_entries(self.entries.len());
        Ok(())
    }

    /// Builds the immutable snapshot one processor invocation runs against.
    fn snapshot_for(
        &self,
        key: &str,
        loaded: Option<&ValueOrFailure<String>>,
    ) -> EntrySnapshot<String, String> {
        if let Some(cell) = loaded {
            return EntrySnapshot::loaded(key.to_string(), cell.clone(), current_timestamp_ms());
        }
        match self.entries.get(key) {
            Some(entry) => {
                EntrySnapshot::resident(key.to_string(), entry.value.clone(), entry.created_at)
            }
            None => EntrySnapshot::absent(key.to_string()),
        }
    }

    /// Re-wraps a stored failure with key context before it reaches a
    /// caller.
    fn stored_failure(key: &str, cause: &FailureCause) -> CacheError {
        CacheError::StoredFailure {
            key: key.to_string(),
            message: cause.to_string(),
        }
    }
}

// == Store Executor ==
/// Per-invocation mutation executor backed by the store.
///
/// Answers the one-shot presence check and applies the terminal action the
/// state machine emits at commit time.
pub struct StoreExecutor<'a> {
    store: &'a mut CacheStore,
    key: &'a str,
    /// The invocation runs against a freshly loaded cell, which is present
    /// by definition for this pass
    loaded: bool,
}

impl MutationExecutor<String, String> for StoreExecutor<'_> {
    fn is_present_or_miss(&mut self) -> bool {
        if self.loaded {
            return true;
        }
        let expired = match self.store.entries.get(self.key) {
            Some(entry) => entry.is_expired(),
            None => {
                self.store.stats.record_miss();
                return false;
            }
        };
        if expired {
            self.store.entries.remove(self.key);
            self.store.tracker.forget(self.key);
            self.store.stats.set_total_entries(self.store.entries.len());
            self.store.stats.record_miss();
            return false;
        }
        self.store.stats.record_hit();
        self.store.tracker.touch(self.key);
        true
    }

    fn propagate_failure(&self, key: &String, cause: &FailureCause) -> CacheError {
        CacheStore::stored_failure(key, cause)
    }

    fn remove(&mut self) {
        if self.store.entries.remove(self.key).is_some() {
            self.store.tracker.forget(self.key);
            self.store.stats.set_total_entries(self.store.entries.len());
        }
    }

    fn put(&mut self, value: ValueOrFailure<String>) {
        let ttl = Some(self.store.default_ttl);
        if let Err(err) = self.store.insert_entry(self.key, CacheEntry::new(value, ttl)) {
            warn!("dropping committed put for key '{}': {}", self.key, err);
        }
    }

    fn put_with_expiry(&mut self, value: ValueOrFailure<String>, expires_at: u64) {
        let entry = CacheEntry::with_expiry_at(value, expires_at);
        if let Err(err) = self.store.insert_entry(self.key, entry) {
            warn!("dropping committed put for key '{}': {}", self.key, err);
        }
    }

    fn expire(&mut self, expires_at: u64) {
        if let Some(entry) = self.store.entries.get_mut(self.key) {
            entry.expires_at = Some(expires_at);
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(100, 300);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_read_through_flag_follows_loader() {
        let store = CacheStore::new(100, 300);
        assert!(!store.is_read_through());

        let loader = Arc::new(|key: &str| -> anyhow::Result<String> { Ok(key.to_string()) });
        let store = store.with_loader(loader);
        assert!(store.is_read_through());
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new(100, 300);

        store.set("key1".to_string(), "value1".to_string(), None).unwrap();
        let value = store.get("key1").unwrap();

        assert_eq!(value, "value1");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = CacheStore::new(100, 300);

        let result = store.get("nonexistent");
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_store_delete() {
        let mut store = CacheStore::new(100, 300);

        store.set("key1".to_string(), "value1".to_string(), None).unwrap();
        store.delete("key1").unwrap();

        assert!(store.is_empty());
        assert!(matches!(store.get("key1"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(100, 300);

        store.set("key1".to_string(), "value1".to_string(), Some(1)).unwrap();
        assert!(store.get("key1").is_ok());

        sleep(Duration::from_millis(1100));

        let result = store.get("key1");
        assert!(matches!(result, Err(CacheError::Expired(_))));
    }

    #[test]
    fn test_store_capacity_eviction() {
        let mut store = CacheStore::new(3, 300);

        store.set("key1".to_string(), "value1".to_string(), None).unwrap();
        store.set("key2".to_string(), "value2".to_string(), None).unwrap();
        store.set("key3".to_string(), "value3".to_string(), None).unwrap();
        store.set("key4".to_string(), "value4".to_string(), None).unwrap();

        assert_eq!(store.len(), 3);
        assert!(matches!(store.get("key1"), Err(CacheError::NotFound(_))));
        assert!(store.get("key4").is_ok());
    }

    #[test]
    fn test_store_recency_touch_on_get() {
        let mut store = CacheStore::new(3, 300);

        store.set("key1".to_string(), "value1".to_string(), None).unwrap();
        store.set("key2".to_string(), "value2".to_string(), None).unwrap();
        store.set("key3".to_string(), "value3".to_string(), None).unwrap();

        store.get("key1").unwrap();
        store.set("key4".to_string(), "value4".to_string(), None).unwrap();

        assert!(store.get("key1").is_ok());
        assert!(matches!(store.get("key2"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_store_key_too_long() {
        let mut store = CacheStore::new(100, 300);
        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);

        let result = store.set(long_key, "value".to_string(), None);
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[test]
    fn test_store_value_too_large() {
        let mut store = CacheStore::new(100, 300);
        let large_value = "x".repeat(MAX_VALUE_SIZE + 1);

        let result = store.set("key".to_string(), large_value, None);
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = CacheStore::new(100, 300);

        store.set("key1".to_string(), "value1".to_string(), Some(1)).unwrap();
        store.set("key2".to_string(), "value2".to_string(), Some(10)).unwrap();

        sleep(Duration::from_millis(1100));

        let removed = store.cleanup_expired();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("key2").is_ok());
    }

    // == Processor Tests ==

    #[test]
    fn test_process_entry_set_value() {
        let mut store = CacheStore::new(100, 300);

        store
            .process_entry("k", |entry| {
                assert!(!entry.exists());
                entry.set_value("v".to_string());
                Ok(())
            })
            .unwrap();

        assert_eq!(store.get("k").unwrap(), "v");
    }

    #[test]
    fn test_process_entry_reads_current_state() {
        let mut store = CacheStore::new(100, 300);
        store.set("k".to_string(), "5".to_string(), None).unwrap();

        store
            .process_entry("k", |entry| {
                assert!(entry.exists());
                assert!(entry.was_existing());
                assert_eq!(entry.value()?, Some(&"5".to_string()));
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_process_entry_undo_create_leaves_store_untouched() {
        let mut store = CacheStore::new(100, 300);

        store
            .process_entry("k", |entry| {
                entry.set_value("7".to_string()).remove();
                Ok(())
            })
            .unwrap();

        assert!(store.is_empty());
    }

    #[test]
    fn test_process_entry_remove_resident() {
        let mut store = CacheStore::new(100, 300);
        store.set("k".to_string(), "5".to_string(), None).unwrap();

        store
            .process_entry("k", |entry| {
                entry.set_value("7".to_string()).remove();
                Ok(())
            })
            .unwrap();

        assert!(matches!(store.get("k"), Err(CacheError::NotFound(_))));
    }

    #[test]
    fn test_process_entry_expire_only() {
        let mut store = CacheStore::new(100, 300);
        store.set("k".to_string(), "5".to_string(), None).unwrap();

        let past = current_timestamp_ms().saturating_sub(1);
        store
            .process_entry("k", |entry| {
                entry.set_expiry(past);
                Ok(())
            })
            .unwrap();

        // Value untouched, expiry rewritten: the next read sees it expired.
        assert!(matches!(store.get("k"), Err(CacheError::Expired(_))));
    }

    #[test]
    fn test_process_entry_put_with_expiry() {
        let mut store = CacheStore::new(100, 300);

        let at = current_timestamp_ms() + 60_000;
        store
            .process_entry("k", |entry| {
                entry.set_value("9".to_string()).set_expiry(at);
                Ok(())
            })
            .unwrap();

        assert_eq!(store.get("k").unwrap(), "9");
        assert_eq!(store.entries["k"].expires_at, Some(at));
    }

    #[test]
    fn test_process_entry_error_commits_nothing() {
        let mut store = CacheStore::new(100, 300);

        let result: Result<()> = store.process_entry("k", |entry| {
            entry.set_value("tentative".to_string());
            Err(ProcessingError::Cache(CacheError::Internal(
                "user logic failed".to_string(),
            )))
        });

        assert!(result.is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_process_entry_stored_exception_round_trip() {
        let mut store = CacheStore::new(100, 300);

        store
            .process_entry("k", |entry| {
                entry.set_exception(anyhow!("backend down"));
                Ok(())
            })
            .unwrap();

        // The stored failure is now a cached result.
        let err = store.get("k").unwrap_err();
        assert!(matches!(err, CacheError::StoredFailure { .. }));
        assert!(err.to_string().contains("backend down"));
    }

    #[test]
    fn test_read_through_loads_and_restarts() {
        let loader =
            Arc::new(|key: &str| -> anyhow::Result<String> { Ok(format!("loaded:{key}")) });
        let mut store = CacheStore::new(100, 300).with_loader(loader);

        let mut invocations = 0;
        let value = store
            .process_entry("k", |entry| {
                invocations += 1;
                let v = entry.value()?.cloned();
                assert!(!entry.was_existing(), "loaded value is not pre-existing");
                assert_eq!(entry.old_value()?, None);
                Ok(v)
            })
            .unwrap();

        assert_eq!(value, Some("loaded:k".to_string()));
        assert_eq!(invocations, 2, "one miss pass, one retry after the load");
        // Read-through installs what it loads.
        assert_eq!(store.get("k").unwrap(), "loaded:k");
        assert_eq!(store.stats().loads, 1);
    }

    #[test]
    fn test_read_through_load_failure_propagates() {
        let loader =
            Arc::new(|_key: &str| -> anyhow::Result<String> { Err(anyhow!("no backend")) });
        let mut store = CacheStore::new(100, 300).with_loader(loader);

        let result = store.process_entry("k", |entry| entry.value().map(|v| v.cloned()));

        let err = result.unwrap_err();
        assert!(matches!(err, CacheError::StoredFailure { .. }));
        assert!(err.to_string().contains("no backend"));
        // A failed load is not installed.
        assert!(store.is_empty());
        assert_eq!(store.stats().load_failures, 1);
    }

    #[test]
    fn test_get_or_load() {
        let loader = Arc::new(|key: &str| -> anyhow::Result<String> { Ok(key.to_uppercase()) });
        let mut store = CacheStore::new(100, 300).with_loader(loader);

        assert_eq!(store.get_or_load("abc").unwrap(), "ABC");
        // Second read is a plain hit.
        assert_eq!(store.get_or_load("abc").unwrap(), "ABC");
        assert_eq!(store.stats().loads, 1);
    }

    #[test]
    fn test_get_or_load_without_loader_is_not_found() {
        let mut store = CacheStore::new(100, 300);
        assert!(matches!(
            store.get_or_load("missing"),
            Err(CacheError::NotFound(_))
        ));
    }

    #[test]
    fn test_increment_from_scratch_and_existing() {
        let mut store = CacheStore::new(100, 300);

        assert_eq!(store.increment("counter", 5).unwrap(), 5);
        assert_eq!(store.increment("counter", -2).unwrap(), 3);
        assert_eq!(store.get("counter").unwrap(), "3");
    }

    #[test]
    fn test_increment_non_integer_value() {
        let mut store = CacheStore::new(100, 300);
        store.set("k".to_string(), "not a number".to_string(), None).unwrap();

        let result = store.increment("k", 1);
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
        // Failed invocation committed nothing.
        assert_eq!(store.get("k").unwrap(), "not a number");
    }

    #[test]
    fn test_processor_commit_drops_oversized_key() {
        let mut store = CacheStore::new(100, 300);
        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);

        store
            .process_entry(&long_key, |entry| {
                entry.set_value("v".to_string());
                Ok(())
            })
            .unwrap();

        // The committed put is rejected by the same limit set() enforces.
        assert!(store.is_empty());
    }

    #[test]
    fn test_processor_commit_drops_oversized_value() {
        let mut store = CacheStore::new(100, 300);

        store
            .process_entry("k", |entry| {
                entry.set_value("x".repeat(MAX_VALUE_SIZE + 1));
                Ok(())
            })
            .unwrap();

        assert!(store.is_empty());
    }

    #[test]
    fn test_increment_with_oversized_key_stores_nothing() {
        let mut store = CacheStore::new(100, 300);
        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);

        let _ = store.increment(&long_key, 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_read_through_rejects_oversized_loaded_value() {
        let loader = Arc::new(|_key: &str| -> anyhow::Result<String> {
            Ok("x".repeat(MAX_VALUE_SIZE + 1))
        });
        let mut store = CacheStore::new(100, 300).with_loader(loader);

        let result = store.get_or_load("k");
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_processor_presence_counts_stats() {
        let mut store = CacheStore::new(100, 300);
        store.set("hit".to_string(), "v".to_string(), None).unwrap();

        store.process_entry("hit", |_entry| Ok(())).unwrap();
        store.process_entry("miss", |_entry| Ok(())).unwrap();

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }
}
