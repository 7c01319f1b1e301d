//! Value-or-Failure Cell Module
//!
//! A stored result is either a real value or a carried failure. Loaders and
//! entry processors can both produce failures, and those failures are cached
//! results in their own right: they are stored, re-read and re-surfaced
//! without losing their identity.

use std::sync::Arc;

// == Failure Cause ==
/// Shared handle to a captured failure.
///
/// Wrapped in an `Arc` so a failure can be cloned into snapshots and read
/// back repeatedly without consuming it.
pub type FailureCause = Arc<anyhow::Error>;

// == Value Or Failure ==
/// A stored result: a real value or a carried failure, never both.
///
/// Whether the cell is a failure can be queried without surfacing the
/// failure itself.
#[derive(Debug, Clone)]
pub enum ValueOrFailure<V> {
    /// A real stored value
    Value(V),
    /// A captured failure, stored in place of a value
    Failure(FailureCause),
}

impl<V> ValueOrFailure<V> {
    // == Constructors ==
    /// Wraps a failure cause into a cell.
    pub fn failure(cause: anyhow::Error) -> Self {
        Self::Failure(Arc::new(cause))
    }

    // == Is Failure ==
    /// Returns true if the cell carries a failure instead of a value.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    // == Value ==
    /// Returns the stored value, or None if the cell carries a failure.
    pub fn value(&self) -> Option<&V> {
        match self {
            Self::Value(v) => Some(v),
            Self::Failure(_) => None,
        }
    }

    // == Failure Cause ==
    /// Returns the carried failure, or None if the cell holds a value.
    pub fn failure_cause(&self) -> Option<&FailureCause> {
        match self {
            Self::Value(_) => None,
            Self::Failure(cause) => Some(cause),
        }
    }
}
