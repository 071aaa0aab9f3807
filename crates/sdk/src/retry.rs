//! Same-node retry delays.
//!
//! Delays follow `initial_backoff * multiplier^(n-1)` capped at `max_backoff`, computed by
//! `backon`'s exponential backoff. The attempt budget is enforced by the engine, not here, so
//! the sequence never ends. Rotating to another node calls [`Backoff::reset`].

use std::time::Duration;

use backon::{BackoffBuilder, ExponentialBackoff, ExponentialBuilder};
use rand::Rng;

use crate::config::RetryPolicy;

/// Delay sequence for retries against the same node.
#[derive(Debug)]
pub struct Backoff {
    builder: ExponentialBuilder,
    current: ExponentialBackoff,
    max: Duration,
    jitter: f64,
}

impl Backoff {
    /// Creates a delay sequence from a retry policy.
    #[must_use]
    pub fn new(policy: &RetryPolicy) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let builder = ExponentialBuilder::new()
            .with_min_delay(policy.initial_backoff)
            .with_max_delay(policy.max_backoff)
            .with_factor(policy.multiplier as f32)
            .without_max_times();
        Self { builder, current: builder.clone().build(), max: policy.max_backoff, jitter: policy.jitter }
    }

    /// Returns the next delay.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current.next().unwrap_or(self.max);
        apply_jitter(delay, self.jitter)
    }

    /// Restarts the sequence at the initial delay.
    pub fn reset(&mut self) {
        self.current = self.builder.clone().build();
    }
}

/// Apply jitter to a duration.
///
/// Jitter adds randomness in the range `[dur * (1 - factor), dur * (1 + factor)]`
/// to prevent thundering herd when multiple clients retry simultaneously.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn apply_jitter(dur: Duration, factor: f64) -> Duration {
    if factor <= 0.0 {
        return dur;
    }

    let factor = factor.clamp(0.0, 1.0);
    let base_nanos = dur.as_nanos() as f64;
    let min_nanos = base_nanos * (1.0 - factor);
    let max_nanos = base_nanos * (1.0 + factor);

    let jittered_nanos = rand::rng().random_range(min_nanos..=max_nanos);
    Duration::from_nanos(jittered_nanos as u64)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy::builder()
            .with_initial_backoff(Duration::from_millis(250))
            .with_max_backoff(Duration::from_secs(1))
            .with_multiplier(2.0)
            .build()
    }

    #[test]
    fn test_doubles_then_caps() {
        let mut backoff = Backoff::new(&policy());
        let delays: Vec<_> = (0..5).map(|_| backoff.next_delay()).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(250),
                Duration::from_millis(500),
                Duration::from_secs(1),
                Duration::from_secs(1),
                Duration::from_secs(1),
            ]
        );
    }

    #[test]
    fn test_reset_restarts_sequence() {
        let mut backoff = Backoff::new(&policy());
        backoff.next_delay();
        backoff.next_delay();
        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_sequence_does_not_end() {
        let mut backoff = Backoff::new(&policy());
        for _ in 0..1000 {
            assert!(backoff.next_delay() <= Duration::from_secs(1));
        }
    }

    #[test]
    fn test_apply_jitter_zero_factor() {
        let dur = Duration::from_millis(100);
        assert_eq!(apply_jitter(dur, 0.0), dur);
    }

    #[test]
    fn test_apply_jitter_within_bounds() {
        let dur = Duration::from_millis(100);
        for _ in 0..100 {
            let jittered = apply_jitter(dur, 0.25);
            assert!(jittered >= Duration::from_millis(75));
            assert!(jittered <= Duration::from_millis(125));
        }
    }

    #[test]
    fn test_apply_jitter_clamps_factor() {
        let dur = Duration::from_millis(100);
        for _ in 0..100 {
            assert!(apply_jitter(dur, 5.0) <= Duration::from_millis(200));
        }
    }
}
