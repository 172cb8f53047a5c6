//! CLI utilities for binaries
//!
//! Handles configuration paths, environment variables and command line
//! flags for the binary executables.

use crate::bin_common::config::ConfigError;
use std::path::PathBuf;

/// Type of configuration to load
#[derive(Debug, Clone)]
pub enum ConfigType {
    /// Strike monitor configuration (monitor.yaml)
    Monitor,
    /// Custom path
    Custom(String),
}

impl ConfigType {
    /// Get the default path for this config type
    pub fn default_path(&self) -> &str {
        match self {
            ConfigType::Monitor => "config/monitor.yaml",
            ConfigType::Custom(path) => path,
        }
    }

    /// Get the environment variable name for this config type
    pub fn env_var_name(&self) -> &str {
        match self {
            ConfigType::Monitor => "MONITOR_CONFIG_PATH",
            ConfigType::Custom(_) => "CONFIG_PATH",
        }
    }
}

/// Load configuration path from environment or use default
pub fn load_config_from_env(config_type: ConfigType) -> PathBuf {
    std::env::var(config_type.env_var_name())
        .unwrap_or_else(|_| config_type.default_path().to_string())
        .into()
}

/// Parse command line arguments for a binary
///
/// Returns a vector of arguments (excluding the program name)
pub fn parse_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}

/// Flags accepted by the strike monitor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    /// Print full strike records instead of one dot each
    pub verbose: bool,
    /// Stop after this many strikes
    pub limit: Option<u64>,
}

impl CliArgs {
    /// Parse `--verbose`, `--limit N` and `--limit=N`
    pub fn parse(args: &[String]) -> Result<Self, ConfigError> {
        let mut parsed = CliArgs::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "-v" | "--verbose" => parsed.verbose = true,
                "--limit" => {
                    let value = iter.next().ok_or_else(|| {
                        ConfigError::ValidationError("--limit requires a value".into())
                    })?;
                    parsed.limit = Some(parse_limit(value)?);
                }
                other => match other.strip_prefix("--limit=") {
                    Some(value) => parsed.limit = Some(parse_limit(value)?),
                    None => {
                        return Err(ConfigError::ValidationError(format!(
                            "unknown argument: {}",
                            other
                        )))
                    }
                },
            }
        }

        Ok(parsed)
    }
}

fn parse_limit(value: &str) -> Result<u64, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::ValidationError(format!("invalid --limit value: {}", value)))
}
