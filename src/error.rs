use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("Hetzner API error: {0}")]
    HetznerApi(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("error fetching storage boxes: {0}")]
    Fetch(#[source] Box<ExporterError>),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP server error: {0}")]
    Server(String),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExporterError {
    /// Wrap a provider failure as a scrape-level fetch error
    pub fn fetch(cause: ExporterError) -> Self {
        ExporterError::Fetch(Box::new(cause))
    }
}

pub type Result<T> = std::result::Result<T, ExporterError>;
