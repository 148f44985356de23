//! Cache Sweeper Task
//!
//! Background task that periodically removes expired entries from every
//! registry cache. Expiry is otherwise lazy (checked on read), so without the
//! sweeper an entry that is never read again would sit in memory until LRU
//! pressure pushes it out.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::registry::CacheRegistry;

/// Spawns a background task that prunes expired entries on an interval.
///
/// The task runs in an infinite loop, sleeping between sweeps. The returned
/// handle can be aborted during graceful shutdown.
///
/// # Arguments
/// * `registry` - Shared cache registry to sweep
/// * `interval_secs` - Interval in seconds between sweeps
pub fn spawn_sweeper(registry: CacheRegistry, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting cache sweeper with interval of {} seconds",
            interval_secs
        );

        loop {
            // Sleep for the configured interval
            tokio::time::sleep(interval).await;

            let removed = registry.prune_expired().await;

            if removed > 0 {
                info!("Cache sweep removed {} expired entries", removed);
            } else {
                debug!("Cache sweep found no expired entries");
            }
        }
    })
}
