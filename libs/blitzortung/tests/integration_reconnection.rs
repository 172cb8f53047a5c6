//! Integration tests for backoff policies
//!
//! These tests verify the delay sequences the client waits between
//! reconnect attempts.

use blitzortung::traits::backoff::{BackoffPolicy, ExponentialBackoff, FixedDelay};
use std::time::Duration;

/// Macro for verbose test output
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

fn assert_close(actual: Duration, expected_ms: f64) {
    let actual_ms = actual.as_secs_f64() * 1e3;
    assert!(
        (actual_ms - expected_ms).abs() < 1e-6,
        "expected {}ms, got {}ms",
        expected_ms,
        actual_ms
    );
}

#[test]
fn test_exponential_backoff_without_jitter() {
    verbose_println!("Testing exponential backoff sequence without jitter...");

    let mut policy = ExponentialBackoff::new(
        Duration::from_millis(500),
        Duration::from_secs(60),
        1.5,
        0.0,
    );

    let expected = [500.0, 750.0, 1125.0, 1687.5, 2531.25];
    for (attempt, &expected_ms) in expected.iter().enumerate() {
        let delay = policy.next_delay();
        verbose_println!("  Attempt {}: {:?}", attempt, delay);
        assert_close(delay, expected_ms);
    }
}

#[test]
fn test_exponential_backoff_caps_at_max() {
    verbose_println!("Testing exponential backoff capping...");

    let mut policy = ExponentialBackoff::new(
        Duration::from_millis(500),
        Duration::from_secs(2),
        2.0,
        0.0,
    );

    let delays: Vec<u128> = (0..6).map(|_| policy.next_delay().as_millis()).collect();
    verbose_println!("  Delays: {:?}", delays);

    assert_eq!(delays, vec![500, 1000, 2000, 2000, 2000, 2000]);
}

#[test]
fn test_default_jitter_stays_in_band() {
    verbose_println!("Testing default jitter bounds...");

    let mut policy = ExponentialBackoff::default();

    for attempt in 0..30 {
        let base = policy.current_interval().as_secs_f64();
        let delay = policy.next_delay().as_secs_f64();

        assert!(
            delay >= base * 0.5 - 1e-9 && delay <= base * 1.5 + 1e-9,
            "attempt {}: {} outside [{}, {}]",
            attempt,
            delay,
            base * 0.5,
            base * 1.5
        );
    }

    // Long runs settle at the cap
    assert_eq!(policy.current_interval(), Duration::from_secs(60));
}

#[test]
fn test_jitter_varies_delays() {
    verbose_println!("Testing that jitter spreads delays...");

    let delays: Vec<Duration> = (0..50)
        .map(|_| ExponentialBackoff::default().next_delay())
        .collect();

    let min = delays.iter().min().unwrap();
    let max = delays.iter().max().unwrap();
    verbose_println!("  First-attempt range: {:?}..{:?}", min, max);

    assert!(min < max, "50 jittered draws should not all be equal");
}

#[test]
fn test_reset_restarts_sequence() {
    verbose_println!("Testing backoff reset...");

    let mut policy = ExponentialBackoff::new(
        Duration::from_millis(125),
        Duration::from_secs(30),
        2.0,
        0.0,
    );

    for _ in 0..5 {
        policy.next_delay();
    }
    assert_eq!(policy.current_interval(), Duration::from_millis(4000));

    policy.reset();
    assert_eq!(policy.current_interval(), Duration::from_millis(125));
    assert_close(policy.next_delay(), 125.0);
}

#[test]
fn test_parameters_are_clamped() {
    let mut policy = ExponentialBackoff::new(
        Duration::from_millis(200),
        Duration::from_secs(10),
        0.5,
        3.0,
    );

    // Multiplier below 1 would shrink delays; it is raised to 1.
    for _ in 0..10 {
        let delay = policy.next_delay();
        assert!(delay <= Duration::from_millis(400));
    }
    assert_eq!(policy.current_interval(), Duration::from_millis(200));
}

#[test]
fn test_fixed_delay_consistency() {
    verbose_println!("Testing fixed delay consistency...");

    let mut policy = FixedDelay::new(Duration::from_millis(750));

    for _ in 0..100 {
        assert_eq!(policy.next_delay(), Duration::from_millis(750));
    }
    policy.reset();
    assert_eq!(policy.next_delay(), Duration::from_millis(750));

    verbose_println!("  All attempts returned 750ms");
}

#[test]
fn test_policies_as_trait_objects() {
    let mut policies: Vec<Box<dyn BackoffPolicy>> = vec![
        Box::new(ExponentialBackoff::default()),
        Box::new(FixedDelay::new(Duration::from_secs(1))),
    ];

    for policy in policies.iter_mut() {
        let delay = policy.next_delay();
        assert!(delay > Duration::ZERO);
        assert!(delay <= Duration::from_secs(1));
        policy.reset();
    }
}
