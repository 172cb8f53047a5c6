use rand::Rng;
use std::time::Duration;

/// Trait for defining reconnection delays
///
/// Implement this trait to control how long the client waits between
/// failed connection attempts. The client never gives up on its own: it
/// only stops retrying on cancellation or shutdown.
pub trait BackoffPolicy: Send + Sync {
    /// Get the delay before the next reconnection attempt
    fn next_delay(&mut self) -> Duration;

    /// Reset the policy state (called after every successful connection)
    fn reset(&mut self);
}

/// Exponential backoff with randomized jitter
///
/// The base interval starts at `initial_interval` and is multiplied by
/// `multiplier` after every attempt, capped at `max_interval`. Each returned
/// delay is drawn uniformly from
/// `[base * (1 - randomization_factor), base * (1 + randomization_factor)]`.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    initial_interval: Duration,
    max_interval: Duration,
    multiplier: f64,
    randomization_factor: f64,
    current_interval: Duration,
}

impl ExponentialBackoff {
    pub const DEFAULT_INITIAL_INTERVAL: Duration = Duration::from_millis(500);
    pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(60);
    pub const DEFAULT_MULTIPLIER: f64 = 1.5;
    pub const DEFAULT_RANDOMIZATION_FACTOR: f64 = 0.5;

    /// Create a new exponential backoff policy
    ///
    /// # Arguments
    /// * `initial_interval` - Base delay before the first retry
    /// * `max_interval` - Upper bound for the base delay
    /// * `multiplier` - Growth factor applied after every attempt
    /// * `randomization_factor` - Jitter ratio, clamped to `0.0..=1.0`
    pub fn new(
        initial_interval: Duration,
        max_interval: Duration,
        multiplier: f64,
        randomization_factor: f64,
    ) -> Self {
        Self {
            initial_interval,
            max_interval,
            multiplier: multiplier.max(1.0),
            randomization_factor: randomization_factor.clamp(0.0, 1.0),
            current_interval: initial_interval,
        }
    }

    /// Base interval the next call to `next_delay` will jitter around
    pub fn current_interval(&self) -> Duration {
        self.current_interval
    }

    fn advance(&mut self) {
        let next = self.current_interval.as_secs_f64() * self.multiplier;
        self.current_interval = if next >= self.max_interval.as_secs_f64() {
            self.max_interval
        } else {
            Duration::from_secs_f64(next)
        };
    }
}

impl Default for ExponentialBackoff {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_INITIAL_INTERVAL,
            Self::DEFAULT_MAX_INTERVAL,
            Self::DEFAULT_MULTIPLIER,
            Self::DEFAULT_RANDOMIZATION_FACTOR,
        )
    }
}

impl BackoffPolicy for ExponentialBackoff {
    fn next_delay(&mut self) -> Duration {
        let base = self.current_interval.as_secs_f64();
        let delta = base * self.randomization_factor;
        let delay = if delta > 0.0 {
            rand::thread_rng().gen_range((base - delta)..=(base + delta))
        } else {
            base
        };

        self.advance();
        Duration::from_secs_f64(delay)
    }

    fn reset(&mut self) {
        self.current_interval = self.initial_interval;
    }
}

/// Fixed delay reconnection policy
///
/// Always waits the same amount of time between reconnection attempts
#[derive(Debug, Clone)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl BackoffPolicy for FixedDelay {
    fn next_delay(&mut self) -> Duration {
        self.delay
    }

    fn reset(&mut self) {
        // No state to reset for fixed delay
    }
}
