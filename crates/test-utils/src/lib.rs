//! Shared test utilities for the Hiero client crates.
//!
//! - [`assert_eventually`] - Poll a condition until it's true or timeout
//! - [`gaps`] - Spacing between consecutive instants, for asserting retry schedules
//! - [`strategies`] - Proptest generators for ids, timestamps and ledgers

#![deny(unsafe_code)]

mod assertions;
pub use assertions::{assert_eventually, gaps};

pub mod strategies;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    use tokio::time::Instant;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_assert_eventually_immediate_success() {
        assert!(assert_eventually(Duration::from_millis(100), || true).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_assert_eventually_after_a_few_polls() {
        let polls = AtomicUsize::new(0);
        let result =
            assert_eventually(Duration::from_millis(500), || polls.fetch_add(1, Ordering::SeqCst) >= 3)
                .await;
        assert!(result);
        assert_eq!(polls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_assert_eventually_times_out() {
        let start = Instant::now();
        assert!(!assert_eventually(Duration::from_millis(50), || false).await);
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn test_gaps() {
        let t0 = Instant::now();
        let times = [t0, t0 + Duration::from_millis(250), t0 + Duration::from_millis(250)];
        assert_eq!(gaps(&times), vec![Duration::from_millis(250), Duration::ZERO]);
        assert!(gaps(&times[..1]).is_empty());
    }
}
