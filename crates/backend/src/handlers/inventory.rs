use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use contracts::shared::api::{InventoryResponse, RevalidateResponse};
use serde_json::json;

use crate::usecases::u101_inventory_sync::cache::InventoryCache;

/// GET /api/inventory
///
/// Serves the cached snapshot, fresh or stale; only the very first request
/// (empty cache) blocks on the upstream and can surface its failure.
pub async fn get_inventory(
    State(cache): State<InventoryCache>,
) -> Result<Json<InventoryResponse>, (StatusCode, Json<serde_json::Value>)> {
    match cache.get().await {
        Ok(read) => Ok(Json(read.into_api_response())),
        Err(e) => {
            tracing::error!("failed to serve inventory: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Failed to fetch inventory data",
                    "message": e.to_string(),
                })),
            ))
        }
    }
}

/// POST /api/inventory/revalidate
///
/// Always 200; never waits for the refresh to finish.
pub async fn trigger_revalidation(
    State(cache): State<InventoryCache>,
) -> Json<RevalidateResponse> {
    tracing::info!("manual revalidation triggered");
    let is_revalidating = cache.trigger_manual_revalidation();
    Json(RevalidateResponse {
        message: "Cache revalidation triggered".to_string(),
        is_revalidating,
    })
}
