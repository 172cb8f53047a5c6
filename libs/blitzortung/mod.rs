//! # Blitzortung
//!
//! Resilient client for the blitzortung.org real-time lightning feed.
//!
//! ## Features
//!
//! - **Payload codec**: LZW-over-code-points inflate for every feed frame
//! - **Typed records**: strikes and detecting stations via serde
//! - **Keepalive**: deadline-based pings, read deadline, bounded writes
//! - **Supervision**: random endpoint per attempt, jittered exponential backoff,
//!   clean shutdown through a normal-closure handshake
//! - **Pluggable transport**: anything implementing `Connector`

pub mod codec;
pub mod core;
pub mod model;
pub mod traits;

// Re-export all traits
pub use traits::*;

// Re-export core client functionality
pub use core::{
    atomic_value, builder, client, config, connection_state, endpoints, heartbeat, runner,
    tungstenite,
    builder::{states, FeedClientBuilder},
    client::{ClientHandle, FeedClient},
    config::{ClientConfig, Timings},
    connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState, Metrics},
    tungstenite::WsConnector,
};

pub use codec::inflate;
pub use model::{Polarity, Station, Strike};

// Convenience function
pub use core::builder as client_builder;
