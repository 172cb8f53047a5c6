use crate::atomic_value::AtomicValue;
use crate::builder::{states::NoHandler, FeedClientBuilder};
use crate::config::ClientConfig;
use crate::connection_state::{AtomicConnectionState, AtomicMetrics, ConnectionState, Metrics};
use crate::endpoints::EndpointPool;
use crate::runner::{Runner, RunnerHandle};
use crate::traits::*;
use crate::tungstenite::WsConnector;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// What the supervisor does with the result of one connection
#[derive(Debug)]
pub(crate) enum Outcome {
    /// Stop and report success
    Done,
    /// Stop and report the error
    Permanent(FeedError),
    /// Back off and reconnect
    Retry(FeedError),
}

/// Decide whether a finished connection ends the client
///
/// A normal closure during shutdown is a clean stop. Cancellation, a bad
/// configuration, and anything else that goes wrong during shutdown are
/// final. Every other failure is retried.
pub(crate) fn classify(result: Result<()>, shutting_down: bool) -> Outcome {
    match result {
        Ok(()) => Outcome::Done,
        Err(e) if shutting_down && e.is_normal_closure() => Outcome::Done,
        Err(e) if shutting_down || e.is_cancelled() => Outcome::Permanent(e),
        Err(e @ FeedError::Configuration(_)) => Outcome::Permanent(e),
        Err(e) => Outcome::Retry(e),
    }
}

/// State shared between the run loop and every ClientHandle
struct Shared {
    /// Guards shutdown against runner publication
    shutting_down: Mutex<bool>,
    runner: AtomicValue<Option<RunnerHandle>>,
    /// Wakes the run loop out of a backoff sleep on shutdown
    wakeup: Notify,
    state: Arc<AtomicConnectionState>,
    metrics: Arc<AtomicMetrics>,
}

impl Shared {
    fn new() -> Self {
        Self {
            shutting_down: Mutex::new(false),
            runner: AtomicValue::new(None),
            wakeup: Notify::new(),
            state: Arc::new(AtomicConnectionState::new(ConnectionState::Disconnected)),
            metrics: Arc::new(AtomicMetrics::new()),
        }
    }

    fn is_shutting_down(&self) -> bool {
        *self.shutting_down.lock()
    }

    fn shutdown(&self) {
        let mut shutting_down = self.shutting_down.lock();
        if *shutting_down {
            debug!("Shutdown already requested");
            return;
        }
        *shutting_down = true;
        self.state.set(ConnectionState::ShuttingDown);
        self.wakeup.notify_waiters();

        if let Some(runner) = self.runner.load() {
            info!("Shutting down feed client");
            runner.shutdown();
        } else {
            debug!("Shutdown requested while not connected");
        }
    }

    /// Make `runner` the current connection
    ///
    /// A runner published after shutdown was requested is told to close
    /// straight away.
    fn publish(&self, runner: RunnerHandle) {
        let shutting_down = self.shutting_down.lock();
        if *shutting_down {
            runner.shutdown();
        } else {
            self.state.set(ConnectionState::Connected);
        }
        self.runner.store(Some(runner));
    }

    fn retire(&self) {
        self.runner.store(None);
    }

    /// Update the connection state unless shutdown already took it over
    fn set_state(&self, state: ConnectionState) {
        let shutting_down = self.shutting_down.lock();
        if !*shutting_down {
            self.state.set(state);
        }
    }
}

/// Cloneable control surface of a running FeedClient
///
/// Safe to use from any thread, including from inside a StrikeHandler.
#[derive(Clone)]
pub struct ClientHandle {
    shared: Arc<Shared>,
}

impl ClientHandle {
    /// Close the current connection cleanly and stop reconnecting
    ///
    /// Idempotent. Calling it before the client connects still prevents
    /// any connection from being kept.
    pub fn shutdown(&self) {
        self.shared.shutdown();
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shared.is_shutting_down()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.shared.state.get()
    }

    pub fn metrics(&self) -> Metrics {
        self.shared.metrics.snapshot()
    }

    /// Queue a frame on the current connection
    ///
    /// Fails with `ChannelSend` while no connection is up.
    pub fn send(&self, frame: Frame) -> Result<()> {
        match self.shared.runner.load() {
            Some(runner) => runner.send(frame),
            None => Err(FeedError::ChannelSend("not connected".into())),
        }
    }
}

/// Supervised client for the lightning strike feed
///
/// Keeps one connection at a time, reconnecting with backoff until it is
/// cancelled or shut down.
///
/// # Example
///
/// ```ignore
/// let mut client = FeedClient::builder()
///     .handler(|strike: Strike| println!("{:?}", strike.time()))
///     .build()?;
///
/// let handle = client.handle();
/// tokio::spawn(async move {
///     tokio::signal::ctrl_c().await.ok();
///     handle.shutdown();
/// });
///
/// client.run(CancellationToken::new()).await?;
/// ```
pub struct FeedClient<C: Connector = WsConnector> {
    config: ClientConfig,
    pool: EndpointPool,
    connector: C,
    handler: Arc<dyn StrikeHandler>,
    error_hook: Option<ErrorHook>,
    backoff: Box<dyn BackoffPolicy>,
    shared: Arc<Shared>,
}

impl FeedClient {
    /// Create a new builder
    pub fn builder() -> FeedClientBuilder<NoHandler> {
        FeedClientBuilder::new()
    }
}

impl<C: Connector> FeedClient<C> {
    pub(crate) fn new(
        config: ClientConfig,
        connector: C,
        handler: Arc<dyn StrikeHandler>,
        error_hook: Option<ErrorHook>,
        backoff: Box<dyn BackoffPolicy>,
    ) -> Self {
        Self {
            pool: EndpointPool::new(config.endpoints.clone()),
            config,
            connector,
            handler,
            error_hook,
            backoff,
            shared: Arc::new(Shared::new()),
        }
    }

    pub fn handle(&self) -> ClientHandle {
        ClientHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Shorthand for `self.handle().shutdown()`
    pub fn shutdown(&self) {
        self.shared.shutdown();
    }

    fn notify_error(&self, err: &FeedError) {
        if let Some(hook) = &self.error_hook {
            hook(err);
        }
    }

    /// Connect and keep reconnecting until cancelled or shut down
    ///
    /// A shutdown before the first attempt or during a backoff sleep ends the
    /// loop with `Ok(())` without dialing again.
    ///
    /// # Returns
    /// * `Ok(())` - Shutdown completed cleanly
    /// * `Err(FeedError::Cancelled)` - `cancel` fired
    /// * `Err(e)` - A permanent failure, or the shutdown did not complete cleanly
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<()> {
        let mut attempt: u64 = 0;

        loop {
            if self.shared.is_shutting_down() {
                info!("Shutdown requested, not connecting");
                break;
            }

            let result = self.run_once(&cancel, attempt).await;
            self.shared.retire();

            match classify(result, self.shared.is_shutting_down()) {
                Outcome::Done => break,
                Outcome::Permanent(e) => {
                    if !e.is_cancelled() {
                        error!("Feed client stopped: {}", e);
                    }
                    self.shared.state.set(ConnectionState::Disconnected);
                    return Err(e);
                }
                Outcome::Retry(e) => {
                    warn!("Connection lost: {}", e);
                    self.notify_error(&e);
                }
            }

            let delay = self.backoff.next_delay();
            self.shared.set_state(ConnectionState::Reconnecting);
            info!("Reconnecting in {:?} (attempt {})", delay, attempt + 1);

            let woken = self.shared.wakeup.notified();
            tokio::pin!(woken);
            woken.as_mut().enable();
            if self.shared.is_shutting_down() {
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = &mut woken => {
                    debug!("Shutdown requested during reconnection delay");
                }
                _ = cancel.cancelled() => {
                    debug!("Cancelled during reconnection delay");
                    self.shared.state.set(ConnectionState::Disconnected);
                    return Err(FeedError::Cancelled);
                }
            }

            attempt += 1;
            self.shared.metrics.increment_reconnects();
        }

        self.shared.state.set(ConnectionState::Disconnected);
        info!("Feed client stopped");
        Ok(())
    }

    /// One connection from dial to teardown
    async fn run_once(&mut self, cancel: &CancellationToken, attempt: u64) -> Result<()> {
        let url = self
            .pool
            .pick()
            .ok_or_else(|| FeedError::Configuration("no endpoints configured".into()))?
            .to_string();
        let timings = self.config.timings;

        self.shared.set_state(if attempt == 0 {
            ConnectionState::Connecting
        } else {
            ConnectionState::Reconnecting
        });
        debug!("Connecting to {}", url);

        let connect = timeout(
            timings.connect_timeout,
            self.connector.connect(&url, self.config.read_limit),
        );
        let (mut writer, reader) = tokio::select! {
            result = connect => match result {
                Ok(connection) => connection?,
                Err(_) => {
                    return Err(FeedError::Timeout(format!(
                        "connect to {} not completed within {:?}",
                        url, timings.connect_timeout
                    )))
                }
            },
            _ = cancel.cancelled() => return Err(FeedError::Cancelled),
        };
        info!("Connected to {}", url);

        let handshake = Frame::Text(self.config.handshake.to_string());
        match timeout(timings.write_wait, writer.send(handshake)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(FeedError::Timeout(format!(
                    "handshake not written within {:?}",
                    timings.write_wait
                )))
            }
        }
        debug!("Sent handshake");

        self.backoff.reset();

        let runner = Runner::spawn(
            writer,
            reader,
            Arc::clone(&self.handler),
            self.error_hook.clone(),
            Arc::clone(&self.shared.metrics),
            timings,
        );
        self.shared.publish(runner.handle());

        runner.run(cancel).await
    }
}
