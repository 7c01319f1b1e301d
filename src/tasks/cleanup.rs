//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries,
//! including entries whose expiry was rewritten by an entry processor's
//! expire-only commit.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically purges expired entries.
///
/// Runs on a fixed tick, taking a write lock on the store for each purge.
/// The returned handle is used to abort the task during graceful shutdown.
pub fn spawn_cleanup_task(
    cache: Arc<RwLock<CacheStore>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {} seconds",
            cleanup_interval_secs
        );

        let mut ticker = tokio::time::interval(Duration::from_secs(cleanup_interval_secs));
        // The first tick fires immediately; skip it so a fresh store is not
        // purged right at startup.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = {
                let mut cache_guard = cache.write().await;
                cache_guard.cleanup_expired()
            };

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
