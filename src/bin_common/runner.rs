//! Binary runner utilities
//!
//! Provides a standardized way to run binaries with proper
//! logging and graceful shutdown.

use tokio_util::sync::CancellationToken;
use tracing::info;

/// Configuration for running a binary application
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Name of the binary (for logging)
    pub name: String,
    /// Print full records instead of progress dots
    pub verbose: bool,
    /// Stop after this many records
    pub limit: Option<u64>,
}

impl RunConfig {
    /// Create a new run configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            verbose: false,
            limit: None,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Set the record limit; zero means unlimited
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }
}

/// Trait for binary applications
pub trait BinaryRunner {
    /// Run the application main loop
    async fn run(&mut self) -> anyhow::Result<()>;

    /// Get the run configuration
    fn config(&self) -> &RunConfig;

    /// Print startup banner
    fn print_banner(&self) {
        let config = self.config();
        info!("");
        info!("========================================");
        info!("Starting {}", config.name);
        if let Some(limit) = config.limit {
            info!("Stopping after {} strikes", limit);
        }
        info!("Press Ctrl+C to stop");
        info!("========================================");
        info!("");
    }

    /// Print shutdown banner
    fn print_shutdown(&self, stats: Option<&str>) {
        let config = self.config();
        info!("");
        info!("========================================");
        info!("{} stopped", config.name);
        if let Some(stats) = stats {
            info!("{}", stats);
        }
        info!("========================================");
    }

    /// Execute the binary with proper initialization and cleanup
    async fn execute(&mut self) -> anyhow::Result<()> {
        self.print_banner();
        let result = self.run().await;
        self.print_shutdown(None);
        result
    }
}

/// Spawn a Ctrl+C signal handler that cancels `token`
pub fn spawn_signal_handler(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("");
            info!("Received shutdown signal (Ctrl+C)");
            token.cancel();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_config_builder() {
        let config = RunConfig::new("test-binary")
            .with_verbose(true)
            .with_limit(5);

        assert_eq!(config.name, "test-binary");
        assert!(config.verbose);
        assert_eq!(config.limit, Some(5));
    }

    #[test]
    fn test_zero_limit_is_unlimited() {
        let config = RunConfig::new("default").with_limit(0);
        assert!(!config.verbose);
        assert_eq!(config.limit, None);
    }
}
