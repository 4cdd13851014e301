//! Configuration validation tests
//!
//! Tests that verify defaults, overrides and startup validation errors.

use secrecy::ExposeSecret;
use std::collections::HashMap;
use std::time::Duration;
use storage_box_exporter::config::{Config, DEFAULT_HCLOUD_ENDPOINT};
use storage_box_exporter::error::ExporterError;

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_defaults_with_only_token() {
    // Given: Only the required token is set
    let config = Config::from_vars(vars(&[("HCLOUD_TOKEN", "secret")])).expect("valid config");

    // Then: Everything else falls back to defaults
    assert_eq!(config.scrape.refresh_interval, Duration::from_secs(10));
    assert_eq!(config.scrape.timeout, Duration::from_secs(30));
    assert_eq!(config.server.listen_addr, "0.0.0.0:2112");
    assert_eq!(config.hcloud.endpoint, DEFAULT_HCLOUD_ENDPOINT);
    assert_eq!(config.hcloud.token.expose_secret(), "secret");
}

#[test]
fn test_environment_overrides_defaults() {
    let config = Config::from_vars(vars(&[
        ("HCLOUD_TOKEN", "secret"),
        ("REFRESH_INTERVAL", "1m30s"),
        ("SCRAPE_TIMEOUT", "5s"),
        ("LISTEN_ADDR", "127.0.0.1:9999"),
        ("HCLOUD_ENDPOINT", "http://localhost:8080/v1"),
    ]))
    .expect("valid config");

    assert_eq!(config.scrape.refresh_interval, Duration::from_secs(90));
    assert_eq!(config.scrape.timeout, Duration::from_secs(5));
    assert_eq!(config.server.listen_addr, "127.0.0.1:9999");
    assert_eq!(config.hcloud.endpoint, "http://localhost:8080/v1");
}

#[test]
fn test_missing_token_is_fatal() {
    let err = Config::from_vars(vars(&[("REFRESH_INTERVAL", "10s")])).unwrap_err();

    assert!(matches!(err, ExporterError::Config(_)));
    assert!(err.to_string().contains("HCLOUD_TOKEN not set"));
}

#[test]
fn test_blank_token_is_fatal() {
    let err = Config::from_vars(vars(&[("HCLOUD_TOKEN", "  ")])).unwrap_err();

    assert!(matches!(err, ExporterError::Config(_)));
    assert!(err.to_string().contains("HCLOUD_TOKEN is empty"));
}

#[test]
fn test_unparsable_interval_is_fatal() {
    let err = Config::from_vars(vars(&[
        ("HCLOUD_TOKEN", "secret"),
        ("REFRESH_INTERVAL", "ten seconds"),
    ]))
    .unwrap_err();

    let message = err.to_string();
    assert!(message.starts_with("Configuration error"));
    assert!(message.contains("REFRESH_INTERVAL"));
    assert!(message.contains("ten seconds"));
}

#[test]
fn test_zero_interval_is_fatal() {
    let err = Config::from_vars(vars(&[
        ("HCLOUD_TOKEN", "secret"),
        ("REFRESH_INTERVAL", "0s"),
    ]))
    .unwrap_err();

    assert!(err.to_string().contains("REFRESH_INTERVAL must be greater than zero"));
}

#[test]
fn test_token_is_not_leaked_by_debug() {
    let config = Config::from_vars(vars(&[("HCLOUD_TOKEN", "very-secret-token")])).unwrap();

    let debug = format!("{:?}", config);
    assert!(!debug.contains("very-secret-token"));
}
