use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use contracts::domain::inventory::InventorySnapshot;
use contracts::shared::api::InventoryResponse;
use tracing::{error, info};

use super::api_client::ProductSource;
use super::errors::SyncError;
use super::processor::process_inventory;
use super::CACHE_TTL_MINUTES;

struct CachedSnapshot {
    snapshot: Arc<InventorySnapshot>,
    cached_at: DateTime<Utc>,
}

struct CacheInner {
    source: Arc<dyn ProductSource>,
    ttl: Duration,
    revalidating: AtomicBool,
    slot: Mutex<Option<CachedSnapshot>>,
}

/// Stale-while-revalidate cache over the aggregated inventory snapshot.
///
/// Cheap to clone; all clones share one state. The snapshot and its
/// timestamp live behind one mutex and are only ever replaced together.
/// The `revalidating` flag is both the single-flight token and the status
/// bit reported to clients: it is flipped with a compare-exchange *before*
/// a refresh task is spawned, so two near-simultaneous triggers cannot
/// both start one.
#[derive(Clone)]
pub struct InventoryCache {
    inner: Arc<CacheInner>,
}

/// What a read of the cache observed, ready to be shaped into the API
/// response.
#[derive(Debug)]
pub struct CacheRead {
    pub snapshot: Arc<InventorySnapshot>,
    pub cached: bool,
    pub stale: bool,
    pub revalidating: bool,
    pub cached_at: DateTime<Utc>,
    pub age_seconds: Option<i64>,
}

impl CacheRead {
    pub fn into_api_response(self) -> InventoryResponse {
        InventoryResponse {
            data: (*self.snapshot).clone(),
            cached: self.cached,
            stale: self.stale,
            revalidating: self.revalidating,
            cached_at: self.cached_at,
            cache_age: self.age_seconds.map(|secs| format!("{secs} seconds")),
        }
    }
}

impl InventoryCache {
    pub fn new(source: Arc<dyn ProductSource>) -> Self {
        Self::with_ttl(source, Duration::minutes(CACHE_TTL_MINUTES))
    }

    /// TTL-injecting constructor, used by tests to simulate clock movement.
    pub fn with_ttl(source: Arc<dyn ProductSource>, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                source,
                ttl,
                revalidating: AtomicBool::new(false),
                slot: Mutex::new(None),
            }),
        }
    }

    pub fn is_revalidating(&self) -> bool {
        self.inner.revalidating.load(Ordering::SeqCst)
    }

    pub fn has_snapshot(&self) -> bool {
        self.inner.slot.lock().expect("cache lock poisoned").is_some()
    }

    pub fn is_stale(&self) -> bool {
        let slot = self.inner.slot.lock().expect("cache lock poisoned");
        match slot.as_ref() {
            Some(cached) => Utc::now() - cached.cached_at >= self.inner.ttl,
            None => false,
        }
    }

    /// Serve the current snapshot.
    ///
    /// A populated cache answers immediately, fresh or stale; a stale hit
    /// additionally kicks off a background revalidation unless one is
    /// already running. Only an empty cache blocks the caller on a full
    /// fetch, and a failure on that path caches nothing.
    pub async fn get(&self) -> Result<CacheRead, SyncError> {
        let now = Utc::now();
        let existing = {
            let slot = self.inner.slot.lock().expect("cache lock poisoned");
            slot.as_ref()
                .map(|cached| (Arc::clone(&cached.snapshot), cached.cached_at))
        };

        if let Some((snapshot, cached_at)) = existing {
            let age = now - cached_at;
            let stale = age >= self.inner.ttl;
            if stale && self.spawn_revalidation() {
                info!("cache is stale, background revalidation started");
            }
            return Ok(CacheRead {
                snapshot,
                cached: true,
                stale,
                revalidating: self.is_revalidating(),
                cached_at,
                age_seconds: Some(age.num_seconds()),
            });
        }

        info!("no cached inventory snapshot, fetching fresh data");
        let (snapshot, cached_at) = self.refresh().await?;
        Ok(CacheRead {
            snapshot,
            cached: false,
            stale: false,
            revalidating: self.is_revalidating(),
            cached_at,
            age_seconds: None,
        })
    }

    /// Start a background revalidation unless one is already in flight.
    /// Returns whether a new one was started.
    pub fn spawn_revalidation(&self) -> bool {
        if self
            .inner
            .revalidating
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            info!("revalidation already in progress, skipping");
            return false;
        }

        let cache = self.clone();
        tokio::spawn(async move {
            info!("background revalidation started");
            match cache.refresh().await {
                Ok(_) => info!("cache revalidated successfully"),
                // Background failures stay here: the previous snapshot
                // remains authoritative and no caller is waiting.
                Err(e) => error!("background revalidation failed: {e}"),
            }
            cache.inner.revalidating.store(false, Ordering::SeqCst);
        });
        true
    }

    /// Fire-and-forget entry point for `POST /api/inventory/revalidate`.
    /// Reports whether a revalidation is in progress after the trigger.
    pub fn trigger_manual_revalidation(&self) -> bool {
        self.spawn_revalidation();
        self.is_revalidating()
    }

    async fn refresh(&self) -> Result<(Arc<InventorySnapshot>, DateTime<Utc>), SyncError> {
        let records = self.inner.source.fetch_all().await?;
        info!("fetched {} raw products from upstream", records.len());

        let snapshot = Arc::new(process_inventory(&records));
        let cached_at = Utc::now();

        let mut slot = self.inner.slot.lock().expect("cache lock poisoned");
        *slot = Some(CachedSnapshot {
            snapshot: Arc::clone(&snapshot),
            cached_at,
        });
        Ok((snapshot, cached_at))
    }
}
