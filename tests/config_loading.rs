//! Integration test: Configuration utilities
//!
//! Tests the bin_common configuration loading functionality.

use blitzortung_watch::bin_common::{load_config_from_env, ConfigType, MonitorConfig};
use std::env;
use std::path::PathBuf;

fn temp_config(name: &str, contents: &str) -> PathBuf {
    let path = env::temp_dir().join(format!("{}-{}.yaml", name, std::process::id()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_monitor_config_default_path() {
    // Clear env var to test default
    env::remove_var("MONITOR_CONFIG_PATH");

    let config_path = load_config_from_env(ConfigType::Monitor);
    assert_eq!(config_path.to_str().unwrap(), "config/monitor.yaml");
}

#[test]
fn test_custom_config() {
    let custom = ConfigType::Custom("custom/path.yaml".to_string());
    let config_path = load_config_from_env(custom);

    assert_eq!(config_path.to_str().unwrap(), "custom/path.yaml");
}

#[test]
fn test_missing_file_yields_defaults() {
    let config = MonitorConfig::load("does/not/exist/monitor.yaml").unwrap();
    assert_eq!(config, MonitorConfig::default());
}

#[test]
fn test_load_from_file() {
    let path = temp_config(
        "monitor-config",
        r#"
log_level: debug
verbose: true
limit: 42
endpoints:
  - wss://ws1.blitzortung.org/
pong_wait_secs: 30
backoff:
  initial_interval_ms: 250
  max_interval_secs: 10
"#,
    );

    let config = MonitorConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.log_level, "debug");
    assert!(config.verbose);
    assert_eq!(config.limit, 42);
    assert_eq!(config.endpoints, vec!["wss://ws1.blitzortung.org/".to_string()]);
    assert_eq!(config.pong_wait_secs, Some(30));
    assert_eq!(config.backoff.initial_interval_ms, 250);
    assert_eq!(config.backoff.max_interval_secs, 10);
    assert_eq!(config.backoff.multiplier, 1.5);
}

#[test]
fn test_invalid_file_is_rejected() {
    let path = temp_config("monitor-config-invalid", "log_level: chatty\n");

    let result = MonitorConfig::load(&path);
    std::fs::remove_file(&path).ok();

    assert!(result.is_err());
}
