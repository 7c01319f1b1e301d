//! Mutable Entry Module
//!
//! The entry-mutation state machine behind atomic entry processing. One
//! instance mediates a single processor invocation against one entry: user
//! logic may read the current value, overwrite it, delete it or adjust its
//! expiry in any order, and the whole sequence collapses into at most one
//! terminal action (remove, put, put-with-expiry, expire-only or nothing)
//! sent to the mutation executor at commit time.
//!
//! The instance is single-threaded, used for exactly one invocation and
//! never shared or reused. Storage, eviction and expiry computation are the
//! executor's business.

use crate::cache::cell::{FailureCause, ValueOrFailure};
use crate::cache::snapshot::{EntrySnapshot, SnapshotOrigin};
use crate::error::{CacheError, ProcessingError};

// == Mutation Executor ==
/// Collaborator that answers the presence check and applies the finalized
/// terminal action.
///
/// The presence check may depend on the current time (expiry), so the state
/// machine invokes it exactly once, at construction. The four terminal
/// actions are fire-and-forget: at most one of them is emitted per
/// invocation, at commit time.
pub trait MutationExecutor<K, V> {
    /// Authoritative, time-sensitive presence check. Called at most once
    /// per state-machine instance.
    fn is_present_or_miss(&mut self) -> bool;

    /// Converts a stored failure into the error surfaced to the reader,
    /// attaching key context.
    fn propagate_failure(&self, key: &K, cause: &FailureCause) -> CacheError;

    /// Terminal action: remove the entry.
    fn remove(&mut self);

    /// Terminal action: store the cell with default expiry policy.
    fn put(&mut self, value: ValueOrFailure<V>);

    /// Terminal action: store the cell with an explicit expiry time.
    fn put_with_expiry(&mut self, value: ValueOrFailure<V>, expires_at: u64);

    /// Terminal action: rewrite the expiry of the resident entry without
    /// touching its value.
    fn expire(&mut self, expires_at: u64);
}

// == Mutable Entry ==
/// Mutable view of one cache entry during one processor invocation.
///
/// Reads are served from the snapshot and the accumulated local state;
/// writes only record intent. Nothing reaches the store until [`commit`]
/// derives the single terminal action.
///
/// [`commit`]: MutableEntry::commit
#[derive(Debug)]
pub struct MutableEntry<'a, K, V, X: MutationExecutor<K, V>> {
    executor: &'a mut X,
    snapshot: &'a EntrySnapshot<K, V>,
    /// Presence determined once at construction time
    original_exists: bool,
    /// Current, possibly mutated, presence
    exists: bool,
    /// Current value or failure; always present while `exists` is true
    value: Option<ValueOrFailure<V>>,
    /// Whether a write or remove must be emitted at commit
    mutate: bool,
    /// Whether the pending terminal action is a removal
    remove: bool,
    /// Whether an explicit expiry override was requested
    custom_expiry: bool,
    expires_at: u64,
    /// Whether a miss should trigger a load restart instead of "no value"
    read_through: bool,
}

impl<'a, K, V: Clone, X: MutationExecutor<K, V>> MutableEntry<'a, K, V, X> {
    // == Constructor ==
    /// Builds the state machine for one invocation.
    ///
    /// Presence and value are established together so that `value()` is
    /// guaranteed to see a cell whenever `exists()` yields true. The
    /// presence check runs only here: it depends on the current time and
    /// must not be repeated later in the invocation.
    pub fn new(executor: &'a mut X, snapshot: &'a EntrySnapshot<K, V>, read_through: bool) -> Self {
        let mut entry = Self {
            executor,
            snapshot,
            original_exists: false,
            exists: false,
            value: None,
            mutate: false,
            remove: false,
            custom_expiry: false,
            expires_at: 0,
            read_through,
        };
        if entry.executor.is_present_or_miss() {
            if let Some(cell) = entry.snapshot.cell() {
                entry.value = Some(cell.clone());
                entry.original_exists = true;
                entry.exists = true;
            }
        }
        entry
    }

    // == Exists ==
    /// Current presence, reflecting any mutation made so far.
    pub fn exists(&self) -> bool {
        self.exists
    }

    // == Set Value ==
    /// Replaces the entry's value. Overwrites any prior pending mutation.
    pub fn set_value(&mut self, v: V) -> &mut Self {
        self.mutate = true;
        self.exists = true;
        self.remove = false;
        self.value = Some(ValueOrFailure::Value(v));
        self
    }

    // == Set Exception ==
    /// Stores a failure as the entry's result. Failures are first-class
    /// stored results, not surfaced immediately.
    pub fn set_exception(&mut self, cause: anyhow::Error) -> &mut Self {
        self.mutate = true;
        self.exists = true;
        self.remove = false;
        self.value = Some(ValueOrFailure::failure(cause));
        self
    }

    // == Set Expiry ==
    /// Requests an explicit expiry time (Unix milliseconds), independent of
    /// any value mutation.
    pub fn set_expiry(&mut self, expires_at: u64) -> &mut Self {
        self.custom_expiry = true;
        self.expires_at = expires_at;
        self
    }

    // == Remove ==
    /// Removes the entry, or cancels the invocation's own pending create.
    ///
    /// If a mutation is pending and the entry did not originally exist, the
    /// pending create is undone and no terminal action results. Otherwise a
    /// removal becomes the pending terminal action.
    pub fn remove(&mut self) -> &mut Self {
        if self.mutate && !self.original_exists {
            self.mutate = false;
        } else {
            self.mutate = true;
            self.remove = true;
        }
        self.exists = false;
        self.value = None;
        self
    }

    // == Key ==
    /// The entry's key.
    pub fn key(&self) -> &K {
        self.snapshot.key()
    }

    // == Value ==
    /// The current value.
    ///
    /// On a miss with read-through enabled and no pending mutation, returns
    /// the load-restart signal. A stored failure is re-surfaced through the
    /// executor's propagation policy. `Ok(None)` is the valid "no value"
    /// answer when read-through is off.
    pub fn value(&self) -> std::result::Result<Option<&V>, ProcessingError> {
        if !self.exists && !self.mutate && self.read_through {
            return Err(ProcessingError::NeedsLoadRestart);
        }
        match &self.value {
            Some(ValueOrFailure::Failure(cause)) => Err(ProcessingError::Cache(
                self.executor.propagate_failure(self.snapshot.key(), cause),
            )),
            Some(ValueOrFailure::Value(v)) => Ok(Some(v)),
            None => Ok(None),
        }
    }

    // == Old Value ==
    /// The value as it was before any mutation in this invocation.
    ///
    /// Returns `None` if the entry did not originally exist, or if the
    /// snapshot's value was loaded as part of this very operation. A stored
    /// failure in the original cell is propagated like in `value()`.
    pub fn old_value(&self) -> std::result::Result<Option<&V>, ProcessingError> {
        if !self.original_exists || self.snapshot.origin() == SnapshotOrigin::FreshlyLoaded {
            return Ok(None);
        }
        match self.snapshot.cell() {
            Some(ValueOrFailure::Failure(cause)) => Err(ProcessingError::Cache(
                self.executor.propagate_failure(self.snapshot.key(), cause),
            )),
            Some(ValueOrFailure::Value(v)) => Ok(Some(v)),
            None => Ok(None),
        }
    }

    // == Was Existing ==
    /// True iff the entry existed before this operation started. A value
    /// loaded during this operation does not count.
    pub fn was_existing(&self) -> bool {
        self.original_exists && self.snapshot.origin() == SnapshotOrigin::Resident
    }

    // == Exception ==
    /// The stored failure, if the current cell carries one.
    ///
    /// Follows the same load-restart rule as `value()`; unlike `value()`,
    /// a stored failure is returned rather than propagated.
    pub fn exception(&self) -> std::result::Result<Option<&FailureCause>, ProcessingError> {
        if !self.exists && !self.mutate && self.read_through {
            return Err(ProcessingError::NeedsLoadRestart);
        }
        match &self.value {
            Some(ValueOrFailure::Failure(cause)) => Ok(Some(cause)),
            _ => Ok(None),
        }
    }

    // == Last Modified ==
    /// Last modification timestamp of the snapshot (Unix milliseconds).
    pub fn last_modified(&self) -> u64 {
        self.snapshot.last_modified()
    }

    // == Commit ==
    /// Finalizes the invocation, emitting at most one terminal action.
    ///
    /// | mutate | remove | custom_expiry | action              |
    /// |--------|--------|---------------|---------------------|
    /// | true   | true   | any           | remove              |
    /// | true   | false  | true          | put_with_expiry     |
    /// | true   | false  | false         | put                 |
    /// | false  | any    | true          | expire              |
    /// | false  | any    | false         | none                |
    ///
    /// Consumes the entry; the instance is never reused.
    pub fn commit(mut self) {
        if self.mutate {
            if self.remove {
                self.executor.remove();
            } else if let Some(value) = self.value.take() {
                // A pending write always has a cell (set_value/set_exception
                // establish it together with the mutate flag).
                if self.custom_expiry {
                    self.executor.put_with_expiry(value, self.expires_at);
                } else {
                    self.executor.put(value);
                }
            }
            return;
        }
        if self.custom_expiry {
            self.executor.expire(self.expires_at);
        }
    }
}
