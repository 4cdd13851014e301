//! Exporter configuration
//!
//! Values are layered from built-in defaults, an optional TOML file and the
//! process environment (highest precedence). Environment keys are the upper-case
//! form of the field names, e.g. `REFRESH_INTERVAL` or `HCLOUD_TOKEN`.

use crate::error::{ExporterError, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_HCLOUD_ENDPOINT: &str = "https://api.hetzner.com/v1";

#[derive(Debug, Clone)]
pub struct Config {
    pub hcloud: HcloudConfig,
    pub server: ServerConfig,
    pub scrape: ScrapeConfig,
}

#[derive(Debug, Clone)]
pub struct HcloudConfig {
    pub token: SecretString,
    pub endpoint: String,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub listen_addr: String,
}

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub refresh_interval: Duration,
    pub timeout: Duration,
}

/// Untyped view of the configuration sources before validation
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default = "default_refresh_interval")]
    refresh_interval: String,
    #[serde(default = "default_scrape_timeout")]
    scrape_timeout: String,
    #[serde(default)]
    hcloud_token: Option<SecretString>,
    #[serde(default = "default_hcloud_endpoint")]
    hcloud_endpoint: String,
    #[serde(default = "default_listen_addr")]
    listen_addr: String,
}

fn default_refresh_interval() -> String {
    "10s".to_string()
}

fn default_scrape_timeout() -> String {
    "30s".to_string()
}

fn default_hcloud_endpoint() -> String {
    DEFAULT_HCLOUD_ENDPOINT.to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:2112".to_string()
}

impl Config {
    /// Load configuration from an optional file and the process environment
    pub fn load(path: Option<&str>) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        Self::build(path, None)
    }

    /// Load configuration from an explicit set of environment variables
    ///
    /// The process environment is not consulted, which keeps tests hermetic.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        Self::build(None, Some(vars))
    }

    fn build(path: Option<&str>, vars: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        let raw: RawConfig = builder
            .add_source(config::Environment::default().source(vars))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| ExporterError::Config(format!("failed to read configuration: {}", e)))?;

        raw.validate()
    }
}

impl RawConfig {
    fn validate(self) -> Result<Config> {
        let token = self.hcloud_token.ok_or_else(|| {
            ExporterError::Config("environment variable HCLOUD_TOKEN not set".to_string())
        })?;
        if token.expose_secret().trim().is_empty() {
            return Err(ExporterError::Config(
                "environment variable HCLOUD_TOKEN is empty".to_string(),
            ));
        }

        let refresh_interval = parse_setting("REFRESH_INTERVAL", &self.refresh_interval)?;
        let timeout = parse_setting("SCRAPE_TIMEOUT", &self.scrape_timeout)?;

        Ok(Config {
            hcloud: HcloudConfig {
                token,
                endpoint: self.hcloud_endpoint,
            },
            server: ServerConfig {
                listen_addr: self.listen_addr,
            },
            scrape: ScrapeConfig {
                refresh_interval,
                timeout,
            },
        })
    }
}

fn parse_setting(name: &str, value: &str) -> Result<Duration> {
    let duration = parse_duration(value)
        .map_err(|e| ExporterError::Config(format!("invalid {} {:?}: {}", name, value, e)))?;
    if duration.is_zero() {
        return Err(ExporterError::Config(format!(
            "{} must be greater than zero",
            name
        )));
    }
    Ok(duration)
}

/// Parse a duration string such as "10s", "500ms", "1m30s" or "1.5h".
///
/// Accepted units are `ns`, `us` (or `µs`), `ms`, `s`, `m` and `h`. A bare
/// `0` is the only unit-less value allowed.
pub fn parse_duration(input: &str) -> std::result::Result<Duration, String> {
    let s = input.trim();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut rest = s;
    let mut nanos = 0f64;
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if num_len == 0 {
            return Err(format!("expected a number at {:?}", rest));
        }
        let (number, tail) = rest.split_at(num_len);
        let value: f64 = number
            .parse()
            .map_err(|_| format!("invalid number {:?}", number))?;

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        let scale = match unit {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            "" => return Err(format!("missing unit after {:?}", number)),
            other => return Err(format!("unknown unit {:?}", other)),
        };

        nanos += value * scale;
        rest = tail;
    }

    if !nanos.is_finite() || nanos > u64::MAX as f64 {
        return Err("duration out of range".to_string());
    }
    Ok(Duration::from_nanos(nanos.round() as u64))
}
