//! Time sources and valid-start generation.
//!
//! Nodes reject a transaction whose valid start lies in the future by their own clock. Valid
//! starts are therefore backdated from "now" by a random amount, which also spreads concurrent
//! clients so they do not collide on identical transaction ids.

use std::time::Duration;

use rand::Rng;

use crate::timestamp::Timestamp;

/// Upper bound (exclusive) on how far a generated valid start is backdated.
pub const MAX_VALID_START_JITTER: Duration = Duration::from_millis(5_000);

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

/// [`Clock`] backed by the operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// [`Clock`] that always reports the same instant. Useful in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// Returns `clock.now()` minus a uniformly random offset in `[0, MAX_VALID_START_JITTER)`.
///
/// The offset is drawn on every call.
pub fn generate_valid_start<R: Rng + ?Sized>(clock: &dyn Clock, rng: &mut R) -> Timestamp {
    let max_nanos = MAX_VALID_START_JITTER.as_nanos() as u64;
    let jitter = Duration::from_nanos(rng.random_range(0..max_nanos));
    clock.now().saturating_sub(jitter)
}
