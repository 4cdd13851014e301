//! Hetzner API Client
//!
//! Thin client for the Storage Box endpoints of the Hetzner API.
//!
//! # Architecture
//!
//! - **Transport**: HTTPS via `reqwest` (rustls)
//! - **Authentication**: API token sent as a bearer token on every request
//! - **Pagination**: `GET /storage_boxes` is followed page by page using
//!   `meta.pagination.next_page` until the listing is exhausted
//!
//! # Example
//!
//! ```no_run
//! use storage_box_exporter::config::HcloudConfig;
//! use storage_box_exporter::hetzner::HetznerClient;
//! use secrecy::SecretString;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = HcloudConfig {
//!     token: SecretString::from("your-api-token"),
//!     endpoint: "https://api.hetzner.com/v1".to_string(),
//! };
//!
//! let client = HetznerClient::new(&config)?;
//! let boxes = client.list_storage_boxes().await?;
//! # Ok(())
//! # }
//! ```

use crate::config::HcloudConfig;
use crate::error::{ExporterError, Result};
use crate::hetzner::types::{ApiErrorResponse, StorageBox, StorageBoxPage};
use crate::hetzner::StorageBoxSource;
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

const PER_PAGE: u64 = 50;

/// Client for the Hetzner Storage Box API
///
/// Cheap to share: the inner `reqwest::Client` pools connections and the
/// client itself is `Send + Sync`.
pub struct HetznerClient {
    http: reqwest::Client,
    endpoint: String,
    token: SecretString,
}

impl HetznerClient {
    pub fn new(config: &HcloudConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("storage-box-exporter/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// List every storage box visible to the token, across all pages
    pub async fn list_storage_boxes(&self) -> Result<Vec<StorageBox>> {
        let mut boxes = Vec::new();
        let mut page = 1;

        loop {
            let mut listing = self.fetch_page(page).await?;
            let next = listing.next_page();
            boxes.append(&mut listing.storage_boxes);

            match next {
                // Guard against a server that keeps pointing backwards
                Some(next) if next > page => page = next,
                _ => break,
            }
        }

        Ok(boxes)
    }

    async fn fetch_page(&self, page: u64) -> Result<StorageBoxPage> {
        let url = format!("{}/storage_boxes", self.endpoint);
        debug!(%url, page, "Fetching storage boxes");

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.token.expose_secret())
            .query(&[("page", page), ("per_page", PER_PAGE)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

/// Build an error from a non-2xx response, preferring the provider's message
fn api_error(status: reqwest::StatusCode, body: &str) -> ExporterError {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(envelope) => ExporterError::HetznerApi(format!(
            "{} ({}): {}",
            envelope.error.code, status, envelope.error.message
        )),
        Err(_) => {
            let snippet: String = body.chars().take(200).collect();
            ExporterError::HetznerApi(format!("unexpected response {}: {}", status, snippet))
        }
    }
}

#[async_trait]
impl StorageBoxSource for HetznerClient {
    async fn list_storage_boxes(&self) -> Result<Vec<StorageBox>> {
        HetznerClient::list_storage_boxes(self).await
    }
}
