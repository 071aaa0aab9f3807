//! Timing assertions for async tests.
//!
//! Both helpers read the tokio clock, so under `#[tokio::test(start_paused = true)]` they are
//! exact and never sleep in real time.

use std::time::Duration;

use tokio::time::{Instant, sleep};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Polls `condition` until it holds or `timeout` elapses.
///
/// Returns whether the condition held. Checked once more after the timeout.
///
/// # Example
///
/// ```no_run
/// use std::{sync::{Arc, atomic::{AtomicBool, Ordering}}, time::Duration};
/// use hiero_test_utils::assert_eventually;
///
/// # async fn run() {
/// let done = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&done);
/// tokio::spawn(async move { flag.store(true, Ordering::SeqCst) });
///
/// assert!(assert_eventually(Duration::from_millis(200), || done.load(Ordering::SeqCst)).await);
/// # }
/// ```
pub async fn assert_eventually<F>(timeout: Duration, condition: F) -> bool
where
    F: Fn() -> bool,
{
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        sleep(POLL_INTERVAL).await;
    }
    condition()
}

/// Returns the durations between consecutive instants.
///
/// Instants out of order yield a zero gap.
#[must_use]
pub fn gaps(instants: &[Instant]) -> Vec<Duration> {
    instants.windows(2).map(|pair| pair[1].saturating_duration_since(pair[0])).collect()
}
