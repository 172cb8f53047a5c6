//! # Feed client core
//!
//! Connection machinery for the lightning strike feed:
//!
//! - **FeedClient**: supervises one connection at a time and reconnects with backoff
//! - **Runner**: drives a single connection (read task, serialized write loop, keepalive)
//! - **PingSchedule**: keepalive deadline shared by the read and write paths
//! - **WsConnector**: tokio-tungstenite transport
//!
//! ## Example
//!
//! ```rust,ignore
//! use blitzortung::{FeedClient, Strike};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> blitzortung::Result<()> {
//!     let mut client = FeedClient::builder()
//!         .handler(|strike: Strike| {
//!             println!("{} {:.3},{:.3}", strike.time(), strike.latitude, strike.longitude);
//!         })
//!         .error_hook(|err| eprintln!("error detected: {}", err))
//!         .build()?;
//!
//!     client.run(CancellationToken::new()).await
//! }
//! ```

pub mod atomic_value;
pub mod builder;
pub mod client;
pub mod config;
pub mod connection_state;
pub mod endpoints;
pub mod heartbeat;
pub mod runner;
pub mod tungstenite;

// Re-export main types
pub use atomic_value::AtomicValue;
pub use builder::{states, FeedClientBuilder};
pub use client::{ClientHandle, FeedClient};
pub use config::{ClientConfig, Timings, DEFAULT_ENDPOINTS, DEFAULT_READ_LIMIT};
pub use connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState, Metrics};
pub use endpoints::EndpointPool;
pub use heartbeat::PingSchedule;
pub use runner::{Runner, RunnerHandle, WriteCommand};
pub use tungstenite::{WsConnector, WsReader, WsWriter};

// Re-export traits for convenience
pub use crate::traits::*;

/// Create a new FeedClient builder
///
/// Convenience for `FeedClient::builder()`.
pub fn builder() -> FeedClientBuilder<states::NoHandler> {
    FeedClientBuilder::new()
}
