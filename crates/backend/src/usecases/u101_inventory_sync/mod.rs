pub mod api_client;
pub mod cache;
pub mod errors;
pub mod processor;
pub mod worker;

/// Records requested per upstream page.
pub const PAGE_SIZE: u32 = 100;
/// Pages fetched concurrently within one batch.
pub const FETCH_BATCH_SIZE: usize = 5;
/// Snapshot freshness window.
pub const CACHE_TTL_MINUTES: i64 = 240;
/// How often the background worker checks for a stale snapshot.
pub const STALE_CHECK_INTERVAL_SECONDS: u64 = 60;
