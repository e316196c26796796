pub mod handlers;
pub mod routes;
pub mod shared;
pub mod usecases;

use std::sync::Arc;

use usecases::u101_inventory_sync::api_client::{InventoryApiClient, ProductSource};
use usecases::u101_inventory_sync::cache::InventoryCache;
use usecases::u101_inventory_sync::worker::StaleCacheWorker;
use usecases::u101_inventory_sync::STALE_CHECK_INTERVAL_SECONDS;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use axum::middleware::{self, Next};
    use axum::response::Response;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Создаем директорию для логов
    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file_path = log_dir.join("backend.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    // Простой middleware для логирования запросов
    async fn request_logger(req: Request<Body>, next: Next) -> Response {
        let start = std::time::Instant::now();
        let method = req.method().clone();
        let uri = req.uri().clone();

        let response = next.run(req).await;

        tracing::info!(
            "{} {} -> {} in {}ms",
            method,
            uri.path(),
            response.status().as_u16(),
            start.elapsed().as_millis()
        );
        response
    }

    let config = shared::config::load_config()?;
    if config.upstream.api_key.is_empty() {
        tracing::warn!("upstream api_key is empty; upstream requests will be rejected");
    }

    let source: Arc<dyn ProductSource> = Arc::new(InventoryApiClient::new(&config.upstream));
    let cache = InventoryCache::new(source);

    // Фоновая проверка устаревания кеша
    let worker = StaleCacheWorker::new(cache.clone(), STALE_CHECK_INTERVAL_SECONDS);
    tokio::spawn(async move {
        worker.run_loop().await;
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::configure_routes(cache.clone())
        .layer(middleware::from_fn(request_logger))
        .layer(cors);

    let addr: SocketAddr = ([0, 0, 0, 0], config.server.port).into();

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    config.server.port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", config.server.port, e);
            }
            // Propagate the error to stop the application
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}
