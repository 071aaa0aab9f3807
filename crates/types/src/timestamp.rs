//! Wall-clock instants with nanosecond precision.
//!
//! A [`Timestamp`] is a `(seconds, nanos)` pair since the Unix epoch, the shape the ledger uses
//! for transaction valid-start times and consensus timestamps. `nanos` is always normalized into
//! `0..1_000_000_000`.

use std::{
    fmt,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Seconds and nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawTimestamp")]
pub struct Timestamp {
    seconds: i64,
    nanos: i32,
}

/// Deserialized form; normalized through [`Timestamp::new`].
#[derive(Deserialize)]
struct RawTimestamp {
    seconds: i64,
    nanos: i64,
}

impl From<RawTimestamp> for Timestamp {
    fn from(raw: RawTimestamp) -> Self {
        Self::new(raw.seconds, raw.nanos)
    }
}

impl Timestamp {
    /// The Unix epoch.
    pub const UNIX_EPOCH: Self = Self { seconds: 0, nanos: 0 };

    /// Creates a timestamp, carrying out-of-range nanoseconds into the seconds field.
    #[must_use]
    pub const fn new(seconds: i64, nanos: i64) -> Self {
        let carry = nanos.div_euclid(NANOS_PER_SECOND);
        let nanos = nanos.rem_euclid(NANOS_PER_SECOND);
        Self { seconds: seconds.saturating_add(carry), nanos: nanos as i32 }
    }

    /// Returns the current system time.
    #[must_use]
    pub fn now() -> Self {
        Self::from(SystemTime::now())
    }

    /// Whole seconds since the epoch.
    #[must_use]
    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Nanoseconds within the second, in `0..1_000_000_000`.
    #[must_use]
    pub const fn nanos(&self) -> i32 {
        self.nanos
    }

    /// Total nanoseconds since the epoch.
    #[must_use]
    pub const fn as_nanos(&self) -> i128 {
        self.seconds as i128 * NANOS_PER_SECOND as i128 + self.nanos as i128
    }

    /// Returns `self + duration`, or `None` on overflow.
    #[must_use]
    pub fn checked_add(&self, duration: Duration) -> Option<Self> {
        let secs = i64::try_from(duration.as_secs()).ok()?;
        let seconds = self.seconds.checked_add(secs)?;
        let nanos = i64::from(self.nanos) + i64::from(duration.subsec_nanos());
        let carry = nanos / NANOS_PER_SECOND;
        Some(Self { seconds: seconds.checked_add(carry)?, nanos: (nanos % NANOS_PER_SECOND) as i32 })
    }

    /// Returns `self - duration`, or `None` on overflow.
    #[must_use]
    pub fn checked_sub(&self, duration: Duration) -> Option<Self> {
        let secs = i64::try_from(duration.as_secs()).ok()?;
        let seconds = self.seconds.checked_sub(secs)?;
        let nanos = i64::from(self.nanos) - i64::from(duration.subsec_nanos());
        if nanos < 0 {
            Some(Self { seconds: seconds.checked_sub(1)?, nanos: (nanos + NANOS_PER_SECOND) as i32 })
        } else {
            Some(Self { seconds, nanos: nanos as i32 })
        }
    }

    /// Returns `self - duration`, clamping at the minimum representable instant.
    #[must_use]
    pub fn saturating_sub(&self, duration: Duration) -> Self {
        self.checked_sub(duration).unwrap_or(Self { seconds: i64::MIN, nanos: 0 })
    }

    /// Returns the elapsed duration since `earlier`, or `None` if `earlier` is later.
    #[must_use]
    pub fn duration_since(&self, earlier: &Self) -> Option<Duration> {
        let delta = self.as_nanos().checked_sub(earlier.as_nanos())?;
        let delta = u128::try_from(delta).ok()?;
        let secs = u64::try_from(delta / NANOS_PER_SECOND as u128).ok()?;
        Some(Duration::new(secs, (delta % NANOS_PER_SECOND as u128) as u32))
    }

    /// Converts to a chrono UTC datetime, if in range.
    #[must_use]
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.seconds, self.nanos as u32)
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Self::UNIX_EPOCH.checked_add(after).unwrap_or(Self { seconds: i64::MAX, nanos: 0 }),
            Err(before) => Self::UNIX_EPOCH.saturating_sub(before.duration()),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(time: DateTime<Utc>) -> Self {
        Self::new(time.timestamp(), i64::from(time.timestamp_subsec_nanos()))
    }
}

impl fmt::Display for Timestamp {
    /// Renders `seconds.nnnnnnnnn`, the nanoseconds zero-padded to nine digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}
