use tokio::time::{self, MissedTickBehavior};
use tracing::info;

use super::cache::InventoryCache;

/// Periodic staleness check over the inventory cache.
///
/// The worker never performs the first population; that belongs to the read
/// path. It only refreshes a snapshot that already exists and has outlived
/// its TTL, and the cache's single-flight flag keeps it from piling up
/// refreshes behind a slow upstream.
pub struct StaleCacheWorker {
    cache: InventoryCache,
    interval_seconds: u64,
}

impl StaleCacheWorker {
    pub fn new(cache: InventoryCache, interval_seconds: u64) -> Self {
        Self {
            cache,
            interval_seconds,
        }
    }

    pub async fn run_loop(&self) {
        info!(
            "stale cache worker started with interval {} seconds",
            self.interval_seconds
        );
        let mut interval = time::interval(time::Duration::from_secs(self.interval_seconds));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            self.check_once();
        }
    }

    fn check_once(&self) {
        if self.cache.has_snapshot() && self.cache.is_stale() {
            info!("cache is stale, triggering auto-revalidation");
            self.cache.spawn_revalidation();
        }
    }
}
