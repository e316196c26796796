use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::inventory::InventorySnapshot;

/// Envelope for `GET /api/inventory`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryResponse {
    pub data: InventorySnapshot,
    pub cached: bool,
    pub stale: bool,
    pub revalidating: bool,
    pub cached_at: DateTime<Utc>,
    /// Present on cache hits only, formatted as "<n> seconds".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_age: Option<String>,
}

/// Envelope for `POST /api/inventory/revalidate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevalidateResponse {
    pub message: String,
    pub is_revalidating: bool,
}
