use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::usecases::u101_inventory_sync::cache::InventoryCache;

/// All application routes.
pub fn configure_routes(cache: InventoryCache) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/inventory", get(handlers::inventory::get_inventory))
        .route(
            "/api/inventory/revalidate",
            post(handlers::inventory::trigger_revalidation),
        )
        .with_state(cache)
}
