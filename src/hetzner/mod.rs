pub mod client;
pub mod types;

pub use client::HetznerClient;
pub use types::{StorageBox, StorageBoxStats, StorageBoxStatus};

use crate::error::Result;
use async_trait::async_trait;

/// Anything that can list the current storage box inventory
///
/// The scrape loop only depends on this trait, so tests can feed it canned
/// inventories instead of talking to the real API.
#[async_trait]
pub trait StorageBoxSource: Send + Sync {
    async fn list_storage_boxes(&self) -> Result<Vec<StorageBox>>;
}
