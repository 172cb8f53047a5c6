//! Single-connection runner
//!
//! # Architecture
//!
//! ```text
//!  ┌──────────────┐  Pong(payload)   ┌──────────────────────────────┐
//!  │  Read task   │ ───────────────> │  Write loop (Runner::run)    │
//!  │              │                  │                              │
//!  │ next_frame() │  final error     │  select!:                    │
//!  │  ├ rearm     │ ───────────────> │   - WriteCommand  ──> writer │
//!  │  ├ inflate   │   (one slot)     │   - heartbeat tick ─> Ping   │
//!  │  └ handler   │                  │   - read task error ─> exit  │
//!  └──────────────┘                  │   - cancellation    ─> exit  │
//!         ^                          └──────────────────────────────┘
//!         │ rearm()     ┌──────────────┐        ^
//!         └────────────>│ PingSchedule │<───────┘ is_due()
//!                       └──────────────┘
//! ```
//!
//! The writer is owned by the write loop and nothing else: pings, pongs,
//! application data and the close frame all arrive there as
//! [`WriteCommand`]s, so no two writes can ever interleave.

use crate::codec::inflate;
use crate::config::Timings;
use crate::connection_state::AtomicMetrics;
use crate::heartbeat::PingSchedule;
use crate::model::Strike;
use crate::traits::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Close code reported when the peer's close frame carries no status
const CLOSE_NO_STATUS: u16 = 1005;

/// Unit of work for the write loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCommand {
    /// Application frame
    Data(Frame),
    /// Keepalive ping
    Ping,
    /// Answer to a server ping, echoing its payload
    Pong(Vec<u8>),
    /// Graceful close handshake
    Close,
}

/// Cloneable submission side of a runner
#[derive(Debug, Clone)]
pub struct RunnerHandle {
    commands: mpsc::UnboundedSender<WriteCommand>,
}

impl RunnerHandle {
    /// Queue a command for the write loop
    pub fn submit(&self, command: WriteCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|e| FeedError::ChannelSend(format!("writer stopped, dropped {:?}", e.0)))
    }

    /// Queue an application frame
    pub fn send(&self, frame: Frame) -> Result<()> {
        self.submit(WriteCommand::Data(frame))
    }

    /// Start the close handshake
    ///
    /// Does nothing if the runner has already stopped.
    pub fn shutdown(&self) {
        if self.submit(WriteCommand::Close).is_err() {
            debug!("Runner already stopped, nothing to shut down");
        }
    }

    /// Whether the write loop has stopped accepting commands
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

/// Everything the read task needs, moved into it on spawn
struct ReadTask<R: FrameReader> {
    reader: R,
    handler: Arc<dyn StrikeHandler>,
    error_hook: Option<ErrorHook>,
    schedule: Arc<PingSchedule>,
    metrics: Arc<AtomicMetrics>,
    commands: mpsc::UnboundedSender<WriteCommand>,
    pong_wait: Duration,
}

impl<R: FrameReader> ReadTask<R> {
    /// Read until the connection fails and return why it did
    async fn run(mut self) -> FeedError {
        loop {
            let frame = match timeout(self.pong_wait, self.reader.next_frame()).await {
                Err(_) => {
                    return FeedError::Timeout(format!(
                        "no frame received within {:?}",
                        self.pong_wait
                    ))
                }
                Ok(None) => return FeedError::ConnectionClosed("stream ended".into()),
                Ok(Some(Err(e))) => return e,
                Ok(Some(Ok(frame))) => frame,
            };

            // Any inbound frame is as good as a pong.
            self.schedule.rearm();

            match frame {
                Frame::Ping(payload) => {
                    debug!("Ping received from server");
                    if let Err(e) = self.commands.send(WriteCommand::Pong(payload)) {
                        return FeedError::ChannelSend(format!("pong not queued: {:?}", e.0));
                    }
                }
                Frame::Pong(_) => debug!("Pong received from server"),
                Frame::Close(close) => {
                    let close = close.unwrap_or(CloseFrame {
                        code: CLOSE_NO_STATUS,
                        reason: String::new(),
                    });
                    debug!("Close frame received (code {})", close.code);
                    return FeedError::Closed {
                        code: close.code,
                        reason: close.reason,
                    };
                }
                data => {
                    if let Some(payload) = data.into_data() {
                        self.dispatch(&payload);
                    }
                }
            }
        }
    }

    fn dispatch(&self, payload: &[u8]) {
        self.metrics.increment_frames();

        let inflated = inflate(payload);
        match serde_json::from_slice::<Strike>(&inflated) {
            Ok(strike) => {
                self.metrics.increment_strikes();
                self.handler.handle_strike(strike);
            }
            Err(source) => {
                self.metrics.increment_parse_errors();
                let err = FeedError::Unmarshal {
                    source,
                    raw: inflated,
                };
                warn!("{}", err);
                if let Some(hook) = &self.error_hook {
                    hook(&err);
                }
            }
        }
    }
}

/// Drives one established connection until it fails or is shut down
pub struct Runner<W: FrameWriter> {
    writer: W,
    commands: mpsc::UnboundedReceiver<WriteCommand>,
    errors: mpsc::Receiver<FeedError>,
    handle: RunnerHandle,
    schedule: Arc<PingSchedule>,
    metrics: Arc<AtomicMetrics>,
    timings: Timings,
    read_task: JoinHandle<()>,
}

impl<W: FrameWriter> Runner<W> {
    /// Spawn the read task for `reader` and prepare the write loop for `writer`
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<R: FrameReader>(
        writer: W,
        reader: R,
        handler: Arc<dyn StrikeHandler>,
        error_hook: Option<ErrorHook>,
        metrics: Arc<AtomicMetrics>,
        timings: Timings,
    ) -> Self {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (errors_tx, errors_rx) = mpsc::channel(1);
        let schedule = Arc::new(PingSchedule::new(timings.ping_period));

        let task = ReadTask {
            reader,
            handler,
            error_hook,
            schedule: Arc::clone(&schedule),
            metrics: Arc::clone(&metrics),
            commands: commands_tx.clone(),
            pong_wait: timings.pong_wait,
        };

        let read_task = tokio::spawn(async move {
            let err = task.run().await;
            debug!("Read task exiting: {}", err);
            let _ = errors_tx.send(err).await;
        });

        Self {
            writer,
            commands: commands_rx,
            errors: errors_rx,
            handle: RunnerHandle {
                commands: commands_tx,
            },
            schedule,
            metrics,
            timings,
            read_task,
        }
    }

    pub fn handle(&self) -> RunnerHandle {
        self.handle.clone()
    }

    /// Run the write loop
    ///
    /// Ends with the read task's error, a failed write, or `Cancelled`.
    /// A requested close ends with the peer's close status, or with `Ok`
    /// when the peer stays silent and the transport closes cleanly.
    pub async fn run(mut self, cancel: &CancellationToken) -> Result<()> {
        let mut ticker = interval(self.timings.heartbeat_tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                Some(command) = self.commands.recv() => match command {
                    WriteCommand::Data(frame) => self.write(frame).await?,
                    WriteCommand::Ping => self.ping().await?,
                    WriteCommand::Pong(payload) => self.write(Frame::Pong(payload)).await?,
                    WriteCommand::Close => return self.close_gracefully().await,
                },
                _ = ticker.tick() => {
                    self.check_ping().await?;
                }
                err = self.errors.recv() => {
                    return Err(err.unwrap_or_else(|| {
                        FeedError::ConnectionClosed("read task stopped".into())
                    }));
                }
                _ = cancel.cancelled() => {
                    debug!("Write loop cancelled");
                    return Err(FeedError::Cancelled);
                }
            }
        }
    }

    /// Ping the server if nothing has been heard from it for a while
    async fn check_ping(&mut self) -> Result<()> {
        if !self.schedule.is_due() {
            return Ok(());
        }

        debug!(
            "No traffic for {:?}, pinging server",
            self.schedule.period()
        );
        self.ping().await
    }

    async fn ping(&mut self) -> Result<()> {
        self.write(Frame::Ping(Vec::new())).await?;
        self.metrics.increment_pings();
        self.schedule.rearm();
        Ok(())
    }

    async fn write(&mut self, frame: Frame) -> Result<()> {
        match timeout(self.timings.write_wait, self.writer.send(frame)).await {
            Ok(result) => result,
            Err(_) => Err(FeedError::Timeout(format!(
                "write not completed within {:?}",
                self.timings.write_wait
            ))),
        }
    }

    /// Send a normal-closure frame and wait, bounded, for the peer to answer
    async fn close_gracefully(&mut self) -> Result<()> {
        info!("Closing connection");

        if let Err(e) = self.write(Frame::Close(Some(CloseFrame::normal()))).await {
            warn!("Failed to send close frame: {}", e);
            let _ = self.force_close().await;
            return Err(e);
        }

        match timeout(self.timings.close_grace, self.errors.recv()).await {
            Ok(Some(err)) => Err(err),
            Ok(None) => Err(FeedError::ConnectionClosed("read task stopped".into())),
            Err(_) => {
                warn!(
                    "Server did not acknowledge close within {:?}, dropping connection",
                    self.timings.close_grace
                );
                self.force_close().await
            }
        }
    }

    async fn force_close(&mut self) -> Result<()> {
        self.read_task.abort();
        match timeout(self.timings.write_wait, self.writer.close()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                debug!("Error while closing transport: {}", e);
                Err(e)
            }
            Err(_) => {
                debug!("Timed out closing transport");
                Err(FeedError::Timeout(format!(
                    "transport not closed within {:?}",
                    self.timings.write_wait
                )))
            }
        }
    }
}

impl<W: FrameWriter> Drop for Runner<W> {
    fn drop(&mut self) {
        self.read_task.abort();
    }
}
