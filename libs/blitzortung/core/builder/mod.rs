pub mod states;

use crate::client::FeedClient;
use crate::config::{ClientConfig, Timings};
use crate::traits::*;
use crate::tungstenite::WsConnector;
use states::*;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

/// Type-state builder for FeedClient
///
/// `build()` only exists once a handler has been set. Everything else has a
/// working default: the public endpoints, the `{"a":542}` handshake, the
/// tokio-tungstenite transport and exponential backoff.
pub struct FeedClientBuilder<H, C = WsConnector>
where
    H: HandlerState,
    C: Connector,
{
    _state: PhantomData<H>,
    config: ClientConfig,
    connector: C,
    handler: Option<Arc<dyn StrikeHandler>>,
    error_hook: Option<ErrorHook>,
    backoff: Option<Box<dyn BackoffPolicy>>,
}

impl FeedClientBuilder<NoHandler> {
    /// Create a new builder instance
    pub fn new() -> Self {
        Self {
            _state: PhantomData,
            config: ClientConfig::default(),
            connector: WsConnector,
            handler: None,
            error_hook: None,
            backoff: None,
        }
    }
}

impl Default for FeedClientBuilder<NoHandler> {
    fn default() -> Self {
        Self::new()
    }
}

// Handler setting
impl<C: Connector> FeedClientBuilder<NoHandler, C> {
    pub fn handler(self, handler: impl StrikeHandler) -> FeedClientBuilder<HasHandler, C> {
        FeedClientBuilder {
            _state: PhantomData,
            config: self.config,
            connector: self.connector,
            handler: Some(Arc::new(handler)),
            error_hook: self.error_hook,
            backoff: self.backoff,
        }
    }
}

// Optional configuration, available in any state
impl<H: HandlerState, C: Connector> FeedClientBuilder<H, C> {
    /// Replace the transport
    pub fn connector<C2: Connector>(self, connector: C2) -> FeedClientBuilder<H, C2> {
        FeedClientBuilder {
            _state: PhantomData,
            config: self.config,
            connector,
            handler: self.handler,
            error_hook: self.error_hook,
            backoff: self.backoff,
        }
    }

    /// Observe decode failures and retryable connection failures
    pub fn error_hook(mut self, hook: impl Fn(&FeedError) + Send + Sync + 'static) -> Self {
        self.error_hook = Some(Arc::new(hook));
        self
    }

    /// Replace the endpoint pool
    pub fn endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    pub fn handshake(mut self, handshake: serde_json::Value) -> Self {
        self.config.handshake = handshake;
        self
    }

    pub fn read_limit(mut self, bytes: usize) -> Self {
        self.config.read_limit = bytes;
        self
    }

    pub fn timings(mut self, timings: Timings) -> Self {
        self.config.timings = timings;
        self
    }

    /// Set the read deadline; the ping period follows at one twelfth of it
    pub fn pong_wait(mut self, pong_wait: Duration) -> Self {
        self.config.timings = self.config.timings.with_pong_wait(pong_wait);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.timings.connect_timeout = timeout;
        self
    }

    /// Delay policy between reconnect attempts
    ///
    /// Defaults to [`ExponentialBackoff::default()`].
    pub fn backoff(mut self, policy: impl BackoffPolicy + 'static) -> Self {
        self.backoff = Some(Box::new(policy));
        self
    }
}

// Build (only available with a handler)
impl<C: Connector> FeedClientBuilder<HasHandler, C> {
    /// Validate the configuration and build the client
    ///
    /// Nothing connects until `FeedClient::run` is awaited.
    pub fn build(self) -> Result<FeedClient<C>> {
        self.config.validate()?;

        let handler = self
            .handler
            .ok_or_else(|| FeedError::Configuration("handler not set".into()))?;
        let backoff = self
            .backoff
            .unwrap_or_else(|| Box::new(ExponentialBackoff::default()));

        Ok(FeedClient::new(
            self.config,
            self.connector,
            handler,
            self.error_hook,
            backoff,
        ))
    }
}
