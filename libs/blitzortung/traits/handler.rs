use crate::error::FeedError;
use crate::model::Strike;
use std::sync::Arc;

/// Consumer of decoded strike records
///
/// Called once per successfully decoded frame, inline on the connection's
/// read task. A slow handler delays the next read and the heartbeat reset,
/// so hand heavy work off to another thread.
///
/// # Example
///
/// ```ignore
/// let (tx, rx) = crossbeam_channel::unbounded();
/// let client = FeedClient::builder()
///     .handler(move |strike: Strike| {
///         let _ = tx.send(strike);
///     })
///     .build()?;
/// ```
pub trait StrikeHandler: Send + Sync + 'static {
    fn handle_strike(&self, strike: Strike);
}

impl<F> StrikeHandler for F
where
    F: Fn(Strike) + Send + Sync + 'static,
{
    fn handle_strike(&self, strike: Strike) {
        self(strike)
    }
}

/// Observer for non-fatal errors
///
/// Receives record decode failures and every retryable connection failure
/// before the next reconnect attempt.
pub type ErrorHook = Arc<dyn Fn(&FeedError) + Send + Sync>;

/// Handler that drops every record
pub struct NoOpHandler;

impl StrikeHandler for NoOpHandler {
    fn handle_strike(&self, _strike: Strike) {}
}
