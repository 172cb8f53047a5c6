//! # Feed client traits
//!
//! Seams between the connection machinery and its collaborators:
//!
//! - **Connector / FrameReader / FrameWriter**: the WebSocket transport
//! - **StrikeHandler**: consumer of decoded records
//! - **BackoffPolicy**: delays between reconnect attempts
//! - **FeedError**: the error taxonomy shared by all of them

pub mod backoff;
pub mod error;
pub mod handler;
pub mod transport;

// Re-export commonly used types
pub use backoff::{BackoffPolicy, ExponentialBackoff, FixedDelay};
pub use error::{FeedError, Result, CLOSE_NORMAL};
pub use handler::{ErrorHook, NoOpHandler, StrikeHandler};
pub use transport::{CloseFrame, Connector, Frame, FrameReader, FrameWriter};
