use crate::traits::*;
use serde_json::json;
use std::time::Duration;

/// Public feed servers; all of them carry the same data
pub const DEFAULT_ENDPOINTS: [&str; 3] = [
    "wss://ws1.blitzortung.org/",
    "wss://ws7.blitzortung.org/",
    "wss://ws8.blitzortung.org/",
];

/// Largest inbound message accepted by default
pub const DEFAULT_READ_LIMIT: usize = 0xffff;

/// Timers driving a single connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Longest silence tolerated on the read side before the connection is dropped
    pub pong_wait: Duration,

    /// How far inbound traffic or a sent ping pushes the next keepalive ping
    pub ping_period: Duration,

    /// Deadline for every single write
    pub write_wait: Duration,

    /// How often the write loop checks whether a ping is due
    pub heartbeat_tick: Duration,

    /// How long a shutdown waits for the peer to acknowledge the close frame
    pub close_grace: Duration,

    /// Deadline for establishing a connection
    pub connect_timeout: Duration,
}

impl Timings {
    /// Set `pong_wait` and derive `ping_period` from it (one twelfth)
    pub fn with_pong_wait(mut self, pong_wait: Duration) -> Self {
        self.pong_wait = pong_wait;
        self.ping_period = pong_wait / 12;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let required = [
            ("pong_wait", self.pong_wait),
            ("ping_period", self.ping_period),
            ("write_wait", self.write_wait),
            ("heartbeat_tick", self.heartbeat_tick),
        ];
        for (name, value) in required {
            if value.is_zero() {
                return Err(FeedError::Configuration(format!("{} must be non-zero", name)));
            }
        }
        Ok(())
    }
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            pong_wait: Duration::from_secs(60),
            ping_period: Duration::from_secs(5),
            write_wait: Duration::from_secs(3),
            heartbeat_tick: Duration::from_secs(2),
            close_grace: Duration::from_secs(2),
            connect_timeout: Duration::from_secs(45),
        }
    }
}

/// Configuration for FeedClient
///
/// Built through `FeedClient::builder()`; the defaults connect to the public
/// feed.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Candidate endpoints, one picked at random per attempt
    pub(crate) endpoints: Vec<String>,

    /// Payload sent as a text frame right after connecting
    pub(crate) handshake: serde_json::Value,

    /// Maximum inbound message size in bytes
    pub(crate) read_limit: usize,

    pub(crate) timings: Timings,
}

impl ClientConfig {
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    pub fn handshake(&self) -> &serde_json::Value {
        &self.handshake
    }

    pub fn read_limit(&self) -> usize {
        self.read_limit
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.endpoints.is_empty() {
            return Err(FeedError::Configuration("at least one endpoint is required".into()));
        }
        if self.read_limit == 0 {
            return Err(FeedError::Configuration("read_limit must be non-zero".into()));
        }
        self.timings.validate()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
            handshake: json!({ "a": 542 }),
            read_limit: DEFAULT_READ_LIMIT,
            timings: Timings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();

        assert_eq!(config.endpoints().len(), 3);
        assert_eq!(config.handshake().to_string(), r#"{"a":542}"#);
        assert_eq!(config.read_limit(), 0xffff);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_timings() {
        let timings = Timings::default();

        assert_eq!(timings.ping_period, timings.pong_wait / 12);
        assert_eq!(timings.write_wait, Duration::from_secs(3));
        assert_eq!(timings.heartbeat_tick, Duration::from_secs(2));
        assert_eq!(timings.close_grace, Duration::from_secs(2));
    }

    #[test]
    fn test_with_pong_wait_derives_ping_period() {
        let timings = Timings::default().with_pong_wait(Duration::from_secs(24));
        assert_eq!(timings.ping_period, Duration::from_secs(2));
    }

    #[test]
    fn test_validation_errors() {
        let mut config = ClientConfig::default();
        config.endpoints.clear();
        assert!(matches!(config.validate(), Err(FeedError::Configuration(_))));

        let mut config = ClientConfig::default();
        config.timings.heartbeat_tick = Duration::ZERO;
        assert!(matches!(config.validate(), Err(FeedError::Configuration(_))));
    }
}
