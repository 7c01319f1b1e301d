//! Entry Processing Support Module
//!
//! Read-through loading contract used by the entry-processor invocation
//! loop. When a processor reads a missing value and a loader is configured,
//! the invocation restarts after the loader ran; the loaded result (value
//! or failure) is presented to the retried invocation as a freshly loaded
//! snapshot.

// == Cache Loader ==
/// Produces values for keys missing from the cache.
///
/// Loader failures are captured and stored as failure cells rather than
/// aborting the invocation, so the retried processor observes them the
/// same way as any stored failure.
pub trait CacheLoader: Send + Sync {
    /// Loads the value for a missing key.
    fn load(&self, key: &str) -> anyhow::Result<String>;
}

// Plain closures work as loaders.
impl<F> CacheLoader for F
where
    F: Fn(&str) -> anyhow::Result<String> + Send + Sync,
{
    fn load(&self, key: &str) -> anyhow::Result<String> {
        self(key)
    }
}
