use thiserror::Error;

/// Close code sent and expected for a voluntary disconnect
pub const CLOSE_NORMAL: u16 = 1000;

/// Main error type for the feed client
#[derive(Error, Debug)]
pub enum FeedError {
    /// WebSocket transport error
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Establishing the connection failed
    #[error("Connect failed: {0}")]
    Connect(String),

    /// The peer sent a close frame
    #[error("Connection closed by peer (code {code}): {reason}")]
    Closed { code: u16, reason: String },

    /// The transport ended without a close frame
    #[error("Connection closed: {0}")]
    ConnectionClosed(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// The run was cancelled by the caller
    #[error("Operation cancelled")]
    Cancelled,

    /// An inflated frame did not decode into a strike record
    #[error("Failed to decode strike: {source}")]
    Unmarshal {
        #[source]
        source: serde_json::Error,
        /// The inflated payload that failed to decode
        raw: Vec<u8>,
    },

    /// Channel send error
    #[error("Channel send error: {0}")]
    ChannelSend(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl FeedError {
    /// Whether this is a close frame carrying the normal-closure code
    pub fn is_normal_closure(&self) -> bool {
        matches!(self, FeedError::Closed { code, .. } if *code == CLOSE_NORMAL)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FeedError::Cancelled)
    }
}

/// Result type for feed client operations
pub type Result<T> = std::result::Result<T, FeedError>;
