//! Strike monitor configuration

use crate::bin_common::cli::CliArgs;
use blitzortung::ExponentialBackoff;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Reconnect delay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    pub initial_interval_ms: u64,
    pub max_interval_secs: u64,
    pub multiplier: f64,
    pub randomization_factor: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial_interval_ms: ExponentialBackoff::DEFAULT_INITIAL_INTERVAL.as_millis() as u64,
            max_interval_secs: ExponentialBackoff::DEFAULT_MAX_INTERVAL.as_secs(),
            multiplier: ExponentialBackoff::DEFAULT_MULTIPLIER,
            randomization_factor: ExponentialBackoff::DEFAULT_RANDOMIZATION_FACTOR,
        }
    }
}

impl BackoffConfig {
    pub fn policy(&self) -> ExponentialBackoff {
        ExponentialBackoff::new(
            Duration::from_millis(self.initial_interval_ms),
            Duration::from_secs(self.max_interval_secs),
            self.multiplier,
            self.randomization_factor,
        )
    }
}

/// Strike monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
    /// Print full strike records
    pub verbose: bool,
    /// Stop after this many strikes, 0 for no limit
    pub limit: u64,
    /// Feed endpoints; empty means the public servers
    pub endpoints: Vec<String>,
    /// Read deadline in seconds; unset keeps the client default
    pub pong_wait_secs: Option<u64>,
    pub backoff: BackoffConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            verbose: false,
            limit: 0,
            endpoints: Vec::new(),
            pong_wait_secs: None,
            backoff: BackoffConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from a YAML file
    ///
    /// A missing file yields the defaults.
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let yaml_content = std::fs::read_to_string(config_path)?;
        Self::from_yaml(&yaml_content)
    }

    pub fn from_yaml(yaml_content: &str) -> Result<Self> {
        let config: MonitorConfig = serde_yaml::from_str(yaml_content)?;
        config.validate()?;
        Ok(config)
    }

    /// Command line flags win over the file
    pub fn apply_args(&mut self, args: &CliArgs) {
        if args.verbose {
            self.verbose = true;
        }
        if let Some(limit) = args.limit {
            self.limit = limit;
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of: {}",
                valid_levels.join(", ")
            )));
        }

        if let Some(endpoint) = self
            .endpoints
            .iter()
            .find(|e| !(e.starts_with("ws://") || e.starts_with("wss://")))
        {
            return Err(ConfigError::ValidationError(format!(
                "endpoint must be a ws:// or wss:// URL: {}",
                endpoint
            )));
        }

        if self.pong_wait_secs == Some(0) {
            return Err(ConfigError::ValidationError(
                "pong_wait_secs must be greater than 0".to_string(),
            ));
        }

        if self.backoff.initial_interval_ms == 0 || self.backoff.max_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "backoff intervals must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Log configuration summary
    pub fn log(&self) {
        info!("Configuration loaded:");
        info!("  Log level: {}", self.log_level);
        info!("  Verbose: {}", self.verbose);
        if self.limit > 0 {
            info!("  Limit: {} strikes", self.limit);
        } else {
            info!("  Limit: none");
        }
        if self.endpoints.is_empty() {
            info!("  Endpoints: public feed");
        } else {
            info!("  Endpoints: {}", self.endpoints.join(", "));
        }
        if let Some(secs) = self.pong_wait_secs {
            info!("  Pong wait: {} seconds", secs);
        }
        info!(
            "  Backoff: {}ms initial, {}s max, x{}",
            self.backoff.initial_interval_ms, self.backoff.max_interval_secs, self.backoff.multiplier
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = MonitorConfig::from_yaml("limit: 10\nbackoff:\n  multiplier: 2.0\n").unwrap();

        assert_eq!(config.limit, 10);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.backoff.multiplier, 2.0);
        assert_eq!(config.backoff.initial_interval_ms, 500);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            MonitorConfig::from_yaml("log_level: loud\n"),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(matches!(
            MonitorConfig::from_yaml("endpoints: [\"http://example.org/\"]\n"),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(matches!(
            MonitorConfig::from_yaml("pong_wait_secs: 0\n"),
            Err(ConfigError::ValidationError(_))
        ));
        assert!(matches!(
            MonitorConfig::from_yaml("limit: [1, 2]\n"),
            Err(ConfigError::YamlError(_))
        ));
    }

    #[test]
    fn test_args_override_file() {
        let mut config = MonitorConfig::from_yaml("verbose: false\nlimit: 10\n").unwrap();
        config.apply_args(&CliArgs {
            verbose: true,
            limit: Some(3),
        });

        assert!(config.verbose);
        assert_eq!(config.limit, 3);

        config.apply_args(&CliArgs::default());
        assert!(config.verbose);
        assert_eq!(config.limit, 3);
    }

    #[test]
    fn test_backoff_policy() {
        let policy = BackoffConfig::default().policy();
        assert_eq!(policy.current_interval(), Duration::from_millis(500));
    }
}
