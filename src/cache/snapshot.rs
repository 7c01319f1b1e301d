//! Entry Snapshot Module
//!
//! A read-only view of one entry's state, captured immediately before user
//! entry-processing logic runs. The snapshot never changes while the
//! processor executes; all mutation intent accumulates in the mutable entry
//! built on top of it.

use crate::cache::cell::ValueOrFailure;

// == Snapshot Origin ==
/// How the snapshot came to hold its value.
///
/// A value produced by a load performed as part of the current operation is
/// not a pre-existing "old" value, so `old_value` and `was_existing` treat
/// `FreshlyLoaded` snapshots as having no history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotOrigin {
    /// The entry was already resident when the operation started
    Resident,
    /// The value was loaded as part of this operation (read-through restart)
    FreshlyLoaded,
}

// == Entry Snapshot ==
/// Immutable view of one entry for the duration of a processor invocation.
#[derive(Debug, Clone)]
pub struct EntrySnapshot<K, V> {
    key: K,
    cell: Option<ValueOrFailure<V>>,
    last_modified: u64,
    origin: SnapshotOrigin,
}

impl<K, V> EntrySnapshot<K, V> {
    // == Constructors ==
    /// Snapshot of an entry that was resident when the operation started.
    pub fn resident(key: K, cell: ValueOrFailure<V>, last_modified: u64) -> Self {
        Self {
            key,
            cell: Some(cell),
            last_modified,
            origin: SnapshotOrigin::Resident,
        }
    }

    /// Snapshot for a key with no resident entry.
    pub fn absent(key: K) -> Self {
        Self {
            key,
            cell: None,
            last_modified: 0,
            origin: SnapshotOrigin::Resident,
        }
    }

    /// Snapshot holding a value or failure produced by a load performed for
    /// this operation.
    pub fn loaded(key: K, cell: ValueOrFailure<V>, loaded_at: u64) -> Self {
        Self {
            key,
            cell: Some(cell),
            last_modified: loaded_at,
            origin: SnapshotOrigin::FreshlyLoaded,
        }
    }

    // == Accessors ==
    /// The entry's key.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The stored value-or-failure cell, if a value was captured.
    pub fn cell(&self) -> Option<&ValueOrFailure<V>> {
        self.cell.as_ref()
    }

    /// Last modification timestamp (Unix milliseconds).
    pub fn last_modified(&self) -> u64 {
        self.last_modified
    }

    /// Whether the value was resident or freshly loaded.
    pub fn origin(&self) -> SnapshotOrigin {
        self.origin
    }
}
