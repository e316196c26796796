use thiserror::Error;

/// Errors raised while refreshing the inventory snapshot.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("upstream API request failed with status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("upstream API request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("failed to parse upstream response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("page fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("aggregation failed: {0}")]
    Aggregation(String),
}
