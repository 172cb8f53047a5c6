//! Keepalive deadline tracking
//!
//! # Architecture
//!
//! ```text
//!   Read task                         Write loop
//!   ─────────                         ──────────
//!   any frame / pong / ping           every heartbeat tick:
//!     └─> rearm()                       is_due()? ──yes──> send Ping
//!           │                                                  │
//!           └──────────> next_ping_ms <────────── rearm() <────┘
//! ```
//!
//! The deadline lives in one atomic so the read task can push it forward on
//! every inbound frame without coordinating with the write loop. A fresh
//! schedule is already due, so a silent connection is pinged on the first
//! tick.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Next keepalive deadline shared between the read and write paths
///
/// Deadlines are stored as milliseconds since an internal epoch to allow
/// atomic u64 operations.
#[derive(Debug)]
pub struct PingSchedule {
    epoch: Instant,
    next_ping_ms: AtomicU64,
    period: Duration,
}

impl PingSchedule {
    /// Create a schedule that is due immediately
    ///
    /// # Arguments
    /// * `period` - How long inbound traffic postpones the next ping
    pub fn new(period: Duration) -> Self {
        Self {
            epoch: Instant::now(),
            next_ping_ms: AtomicU64::new(0),
            period,
        }
    }

    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    /// Push the next ping `period` into the future
    ///
    /// Called whenever the server proves it is alive, and after every ping.
    pub fn rearm(&self) {
        let deadline = self.now_ms() + self.period.as_millis() as u64;
        self.next_ping_ms.store(deadline, Ordering::Release);
    }

    /// Whether the connection has been quiet long enough to need a ping
    pub fn is_due(&self) -> bool {
        self.now_ms() >= self.next_ping_ms.load(Ordering::Acquire)
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}
