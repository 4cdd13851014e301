//! Binary exit status and fatal error reporting

use std::process::Command;

#[test]
fn test_missing_token_exits_with_single_error_report() {
    // Given: No API token anywhere in the environment
    let output = Command::new(env!("CARGO_BIN_EXE_storage-box-exporter"))
        .env_remove("HCLOUD_TOKEN")
        .env("RUST_LOG", "info")
        .output()
        .expect("failed to run exporter");

    // Then: The process fails with exit code 1
    assert_eq!(output.status.code(), Some(1));

    // And: The cause is reported once, on stderr only
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stderr.matches("HCLOUD_TOKEN not set").count(), 1, "stderr: {}", stderr);
    assert!(!stdout.contains("HCLOUD_TOKEN"), "stdout: {}", stdout);
}
