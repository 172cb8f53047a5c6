//! Transport abstraction
//!
//! The runner only needs a message-oriented, full-duplex connection that can
//! be split into one reading half and one writing half:
//!
//! ```text
//! Connector::connect(url) ──> (FrameWriter, FrameReader)
//!                                   │              │
//!                          write loop only   read task only
//! ```
//!
//! Deadlines are applied by the runner with `tokio::time::timeout`, so
//! implementations only have to move frames.

use crate::error::{Result, CLOSE_NORMAL};
use async_trait::async_trait;

/// Close frame payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseFrame {
    pub code: u16,
    pub reason: String,
}

impl CloseFrame {
    /// Close frame with the normal-closure code and no reason
    pub fn normal() -> Self {
        Self {
            code: CLOSE_NORMAL,
            reason: String::new(),
        }
    }
}

/// A single WebSocket frame, data or control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
    Ping(Vec<u8>),
    Pong(Vec<u8>),
    Close(Option<CloseFrame>),
}

impl Frame {
    /// Payload bytes of a data frame, `None` for control frames
    pub fn into_data(self) -> Option<Vec<u8>> {
        match self {
            Frame::Text(text) => Some(text.into_bytes()),
            Frame::Binary(data) => Some(data),
            Frame::Ping(_) | Frame::Pong(_) | Frame::Close(_) => None,
        }
    }
}

/// Reading half of a connection
#[async_trait]
pub trait FrameReader: Send + 'static {
    /// Wait for the next frame
    ///
    /// # Returns
    /// * `Some(Ok(frame))` - A frame arrived
    /// * `Some(Err(e))` - The transport failed
    /// * `None` - The stream ended
    async fn next_frame(&mut self) -> Option<Result<Frame>>;
}

/// Writing half of a connection
#[async_trait]
pub trait FrameWriter: Send + 'static {
    /// Write and flush one frame
    async fn send(&mut self, frame: Frame) -> Result<()>;

    /// Tear the writing half down without waiting for the peer
    async fn close(&mut self) -> Result<()>;
}

/// Opens connections to feed endpoints
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Writer: FrameWriter;
    type Reader: FrameReader;

    /// Connect to `url`, refusing inbound messages larger than `read_limit` bytes
    async fn connect(&self, url: &str, read_limit: usize) -> Result<(Self::Writer, Self::Reader)>;
}
