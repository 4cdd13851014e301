//! Hetzner Storage Box Prometheus Exporter
//!
//! Periodically polls the Hetzner API for storage boxes and re-exposes their
//! status and usage as Prometheus metrics, alongside liveness and readiness checks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐       HTTPS          ┌──────────────┐
//! │  Hetzner    │ ◄─────────────────►  │   Exporter   │
//! │    API      │   GET /storage_boxes │              │
//! └─────────────┘                      │  ┌────────┐  │      HTTP      ┌────────────┐
//!                                      │  │Scrape  │  │ ◄────────────► │ Prometheus │
//!                                      │  │ loop   │  │   /metrics     └────────────┘
//!                                      │  └────────┘  │   /healthz
//!                                      │  ┌────────┐  │   /readyz
//!                                      │  │Metrics │  │
//!                                      │  └────────┘  │
//!                                      └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`hetzner`] - API client, response types and the [`hetzner::StorageBoxSource`] seam
//! - [`collectors`] - Turns one fetch into gauge writes
//! - [`metrics`] - Prometheus metric definitions
//! - [`scheduler`] - Scrape loop and readiness flag
//! - [`server`] - HTTP endpoints
//! - [`lifecycle`] - Signal handling and shutdown ordering
//! - [`config`] - Configuration management
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use storage_box_exporter::{config::Config, lifecycle};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load(None)?;
//!     lifecycle::run(config).await
//! }
//! ```

pub mod collectors;
pub mod config;
pub mod error;
pub mod hetzner;
pub mod lifecycle;
pub mod metrics;
pub mod scheduler;
pub mod server;
