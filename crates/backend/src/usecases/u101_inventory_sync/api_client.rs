use async_trait::async_trait;
use contracts::domain::inventory::RawProduct;

use super::errors::SyncError;
use super::{FETCH_BATCH_SIZE, PAGE_SIZE};
use crate::shared::config::UpstreamConfig;

const TOTAL_PAGES_HEADER: &str = "X-Total-Pages-Count";
const TOTAL_COUNT_HEADER: &str = "X-Total-Count";
const PER_PAGE_HEADER: &str = "X-Per-Page";

/// Anything that can produce the full upstream product list. The HTTP client
/// below is the production implementation; tests substitute their own.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<RawProduct>, SyncError>;
}

/// HTTP client for the paginated `/products` resource of the inventory API.
#[derive(Clone)]
pub struct InventoryApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl InventoryApiClient {
    pub fn new(config: &UpstreamConfig) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Fetch every product across all pages.
    ///
    /// Page 1 is requested alone to learn the total page count from the
    /// response headers. The remaining pages are fetched in concurrent
    /// batches of [`FETCH_BATCH_SIZE`]; within a batch the results are
    /// appended in page order, not completion order, so the final sequence
    /// is always ascending by page. Any failed page aborts the whole call.
    pub async fn fetch_all_products(&self) -> Result<Vec<RawProduct>, SyncError> {
        let response = self.request_page(1).await?;

        let total_pages = header_value(&response, TOTAL_PAGES_HEADER)
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1);
        let total_records = header_value(&response, TOTAL_COUNT_HEADER);
        let per_page = header_value(&response, PER_PAGE_HEADER);

        let mut products = parse_page(response, 1).await?;
        tracing::info!(
            total_pages,
            total_records = ?total_records,
            per_page = ?per_page,
            first_page_products = products.len(),
            "pagination info"
        );

        if total_pages <= 1 {
            tracing::info!("total products fetched: {}", products.len());
            return Ok(products);
        }

        let remaining_pages: Vec<u32> = (2..=total_pages).collect();
        tracing::info!("fetching {} remaining pages in batches", remaining_pages.len());

        for batch in remaining_pages.chunks(FETCH_BATCH_SIZE) {
            tracing::debug!("fetching batch: pages {} to {}", batch[0], batch[batch.len() - 1]);

            let mut handles = Vec::with_capacity(batch.len());
            for &page in batch {
                let client = self.clone();
                handles.push(tokio::spawn(async move { client.fetch_page(page).await }));
            }
            // Await in the order the batch was built; page order is part of
            // the contract even though completion order is not.
            for handle in handles {
                products.extend(handle.await??);
            }

            tracing::debug!("progress: {} products fetched so far", products.len());
        }

        tracing::info!("total products fetched: {}", products.len());
        Ok(products)
    }

    async fn fetch_page(&self, page: u32) -> Result<Vec<RawProduct>, SyncError> {
        let response = self.request_page(page).await?;
        parse_page(response, page).await
    }

    async fn request_page(&self, page: u32) -> Result<reqwest::Response, SyncError> {
        let url = format!(
            "{}/products?page_size={}&page={}",
            self.base_url, PAGE_SIZE, page
        );

        let response = self
            .client
            .get(&url)
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("inventory API error on page {}: {} {}", page, status, body);
            return Err(SyncError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl ProductSource for InventoryApiClient {
    async fn fetch_all(&self) -> Result<Vec<RawProduct>, SyncError> {
        self.fetch_all_products().await
    }
}

fn header_value(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

async fn parse_page(response: reqwest::Response, page: u32) -> Result<Vec<RawProduct>, SyncError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(500).collect();
        tracing::error!("failed to parse page {}: {}. Body: {}", page, e, preview);
        SyncError::Parse(e)
    })
}
