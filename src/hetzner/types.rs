//! Hetzner API Type Definitions
//!
//! Rust structs for the Storage Box endpoints of the Hetzner API
//! (`GET /storage_boxes`). Only the fields this exporter reads are modelled
//! strictly; everything else is optional so that additions on the provider side
//! never break deserialization.
//!
//! # Design Notes
//!
//! - **Forward compatibility**: unknown statuses decode to [`StorageBoxStatus::Unknown`]
//!   instead of failing the whole page.
//! - **Serde Defaults**: `#[serde(default)]` covers fields the API may omit or null.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Lifecycle status of a storage box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBoxStatus {
    Initializing,
    Active,
    Locked,
    /// A status this exporter does not know about yet
    #[default]
    #[serde(other)]
    Unknown,
}

impl StorageBoxStatus {
    /// Statuses exported as indicator series, in exposition order
    pub const KNOWN: [StorageBoxStatus; 3] = [
        StorageBoxStatus::Initializing,
        StorageBoxStatus::Active,
        StorageBoxStatus::Locked,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBoxStatus::Initializing => "initializing",
            StorageBoxStatus::Active => "active",
            StorageBoxStatus::Locked => "locked",
            StorageBoxStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StorageBoxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Disk usage of a storage box, in bytes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageBoxStats {
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub size_data: u64,
    #[serde(default)]
    pub size_snapshots: u64,
}

/// A storage box as returned by `GET /storage_boxes`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageBox {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub status: StorageBoxStatus,
    #[serde(default)]
    pub stats: StorageBoxStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}

/// One page of the storage box listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageBoxPage {
    #[serde(default)]
    pub storage_boxes: Vec<StorageBox>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

impl StorageBoxPage {
    /// Page number to request next, if the listing continues
    pub fn next_page(&self) -> Option<u64> {
        self.meta
            .as_ref()
            .and_then(|m| m.pagination.as_ref())
            .and_then(|p| p.next_page)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub per_page: u64,
    #[serde(default)]
    pub previous_page: Option<u64>,
    #[serde(default)]
    pub next_page: Option<u64>,
    #[serde(default)]
    pub last_page: Option<u64>,
    #[serde(default)]
    pub total_entries: Option<u64>,
}

/// Error envelope returned with non-2xx responses
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}
