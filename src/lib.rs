//! Blitzortung Watch - Main Library
//!
//! Command-line tooling around the `blitzortung` feed client.
//!
//! ## Architecture
//!
//! - **bin_common**: Common utilities for binary executables (CLI, config, logging, runners)
//! - **blitzortung**: Feed client library (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust,ignore
//! use blitzortung_watch::bin_common::{load_config_from_env, ConfigType, MonitorConfig};
//! use blitzortung_watch::blitzortung::FeedClient;
//! ```

// Re-export workspace libraries for convenience
pub use blitzortung;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables

    pub mod cli;
    pub mod config;
    pub mod logging;
    pub mod runner;

    pub use cli::{load_config_from_env, parse_args, CliArgs, ConfigType};
    pub use config::{BackoffConfig, ConfigError, MonitorConfig};
    pub use logging::init_tracing;
    pub use runner::{spawn_signal_handler, BinaryRunner, RunConfig};
}
