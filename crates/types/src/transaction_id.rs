//! Transaction identifiers.
//!
//! A [`TransactionId`] names one logical transaction: the paying account, the instant from
//! which the transaction is valid, whether it is the scheduled form, and an optional nonce that
//! distinguishes child transactions sharing the same payer and valid start. The network
//! deduplicates submissions on this key, so a retry must reuse the id unchanged.
//!
//! # Text form
//!
//! ```text
//! {payer}@{seconds}.{nanos:09}[?scheduled][/{nonce}]
//! ```
//!
//! The scheduled suffix always precedes the nonce suffix.

use std::{fmt, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use snafu::ensure;

use crate::{
    checksum::LedgerId,
    clock::{Clock, SystemClock, generate_valid_start},
    entity_id::AccountId,
    error::{IdError, MalformedTransactionIdSnafu},
    timestamp::Timestamp,
};

const SCHEDULED_SUFFIX: &str = "?scheduled";

/// Correlation key for a transaction and everything fetched about it afterwards.
///
/// Equality covers all four fields. Ordering is by payer, then valid start, with the scheduled
/// flag and nonce only breaking ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransactionId {
    /// The account paying for the transaction.
    pub account_id: AccountId,
    /// Start of the window in which the network accepts the transaction.
    pub valid_start: Timestamp,
    /// Whether this identifies the scheduled inner transaction.
    pub scheduled: bool,
    /// Disambiguates child transactions. Never `Some(0)`.
    pub nonce: Option<i32>,
}

impl TransactionId {
    /// Generates a fresh id for `payer` from the system clock.
    ///
    /// The valid start is backdated by a random amount below five seconds, re-drawn per call.
    #[must_use]
    pub fn generate(payer: AccountId) -> Self {
        Self::generate_with(payer, &SystemClock, &mut rand::rng())
    }

    /// Generates a fresh id for `payer` from an explicit clock and random source.
    pub fn generate_with<R: Rng + ?Sized>(payer: AccountId, clock: &dyn Clock, rng: &mut R) -> Self {
        Self::with_valid_start(payer, generate_valid_start(clock, rng))
    }

    /// Creates an id with an explicit valid start.
    #[must_use]
    pub const fn with_valid_start(payer: AccountId, valid_start: Timestamp) -> Self {
        Self { account_id: payer, valid_start, scheduled: false, nonce: None }
    }

    /// Returns a copy with the scheduled flag set.
    #[must_use]
    pub const fn with_scheduled(mut self, scheduled: bool) -> Self {
        self.scheduled = scheduled;
        self
    }

    /// Sets the scheduled flag.
    pub fn set_scheduled(&mut self, scheduled: bool) -> &mut Self {
        self.scheduled = scheduled;
        self
    }

    /// Returns a copy with the given nonce. A nonce of zero clears it.
    #[must_use]
    pub fn with_nonce(mut self, nonce: i32) -> Self {
        self.set_nonce(nonce);
        self
    }

    /// Sets the nonce. A nonce of zero clears it.
    pub fn set_nonce(&mut self, nonce: i32) -> &mut Self {
        self.nonce = (nonce != 0).then_some(nonce);
        self
    }

    /// Renders the text form with the payer's checksum for `ledger`.
    #[must_use]
    pub fn to_string_with_checksum(&self, ledger: &LedgerId) -> String {
        let mut out = format!(
            "{}@{}",
            self.account_id.to_string_with_checksum(ledger),
            self.valid_start
        );
        self.write_suffixes(&mut out);
        out
    }

    fn write_suffixes(&self, out: &mut String) {
        if self.scheduled {
            out.push_str(SCHEDULED_SUFFIX);
        }
        if let Some(nonce) = self.nonce {
            out.push('/');
            out.push_str(&nonce.to_string());
        }
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = format!("{}@{}", self.account_id, self.valid_start);
        self.write_suffixes(&mut out);
        f.write_str(&out)
    }
}

impl FromStr for TransactionId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (payer, rest) = s.split_once('@').ok_or_else(|| {
            MalformedTransactionIdSnafu { input: s, reason: "missing '@'" }.build()
        })?;

        let (rest, nonce) = match rest.split_once('/') {
            Some((rest, nonce)) => (rest, Some(parse_nonce(s, nonce)?)),
            None => (rest, None),
        };

        let (timestamp, scheduled) = match rest.strip_suffix(SCHEDULED_SUFFIX) {
            Some(timestamp) => (timestamp, true),
            None => (rest, false),
        };

        let account_id = payer.parse::<AccountId>().map_err(|e| {
            MalformedTransactionIdSnafu { input: s, reason: e.to_string() }.build()
        })?;

        let mut id = Self::with_valid_start(account_id, parse_valid_start(s, timestamp)?)
            .with_scheduled(scheduled);
        if let Some(nonce) = nonce {
            id.set_nonce(nonce);
        }
        Ok(id)
    }
}

/// Parses `seconds.nanos`, where seconds may be negative and nanos is exactly nine digits.
fn parse_valid_start(input: &str, text: &str) -> Result<Timestamp, IdError> {
    let Some((seconds, nanos)) = text.split_once('.') else {
        return MalformedTransactionIdSnafu { input, reason: "valid start must be seconds.nanos" }
            .fail();
    };

    ensure!(
        is_signed_digits(seconds),
        MalformedTransactionIdSnafu { input, reason: format!("'{seconds}' is not a number of seconds") }
    );
    ensure!(
        nanos.len() == 9 && is_digits(nanos),
        MalformedTransactionIdSnafu { input, reason: "nanos must be exactly nine digits" }
    );

    let seconds = seconds.parse::<i64>().map_err(|_| {
        MalformedTransactionIdSnafu { input, reason: "seconds exceed the 64-bit range" }.build()
    })?;
    let nanos = nanos.parse::<i64>().map_err(|_| {
        MalformedTransactionIdSnafu { input, reason: "nanos are not a number" }.build()
    })?;

    Ok(Timestamp::new(seconds, nanos))
}

fn parse_nonce(input: &str, text: &str) -> Result<i32, IdError> {
    ensure!(
        is_signed_digits(text),
        MalformedTransactionIdSnafu { input, reason: format!("'{text}' is not a nonce") }
    );
    text.parse::<i32>().map_err(|_| {
        MalformedTransactionIdSnafu { input, reason: "nonce exceeds the 32-bit range" }.build()
    })
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Digits with an optional leading `-`. A leading `+` is rejected.
fn is_signed_digits(text: &str) -> bool {
    is_digits(text.strip_prefix('-').unwrap_or(text))
}

impl Serialize for TransactionId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TransactionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::clock::{FixedClock, MAX_VALID_START_JITTER};

    fn payer() -> AccountId {
        AccountId::new(0, 0, 100)
    }

    #[test]
    fn test_parse_scheduled_with_nonce() {
        let id: TransactionId = "0.0.100@1691600000.000000001?scheduled/2".parse().unwrap();
        assert_eq!(id.account_id, payer());
        assert_eq!(id.valid_start, Timestamp::new(1_691_600_000, 1));
        assert!(id.scheduled);
        assert_eq!(id.nonce, Some(2));
    }

    #[test]
    fn test_display_all_suffix_combinations() {
        let base = TransactionId::with_valid_start(payer(), Timestamp::new(1_691_600_000, 1));
        assert_eq!(base.to_string(), "0.0.100@1691600000.000000001");
        assert_eq!(base.with_scheduled(true).to_string(), "0.0.100@1691600000.000000001?scheduled");
        assert_eq!(base.with_nonce(7).to_string(), "0.0.100@1691600000.000000001/7");
        assert_eq!(
            base.with_scheduled(true).with_nonce(7).to_string(),
            "0.0.100@1691600000.000000001?scheduled/7"
        );
    }

    #[test]
    fn test_parse_payer_checksum() {
        let id: TransactionId = "0.0.123-vfmkw@5.000000000".parse().unwrap();
        assert_eq!(id.account_id.checksum().unwrap().as_str(), "vfmkw");
        assert!(id.account_id.validate_checksum(&LedgerId::mainnet()).is_ok());
    }

    #[test]
    fn test_to_string_with_checksum() {
        let id = TransactionId::with_valid_start(AccountId::new(0, 0, 123), Timestamp::new(5, 0));
        assert_eq!(id.to_string_with_checksum(&LedgerId::testnet()), "0.0.123-esxsf@5.000000000");
    }

    #[test]
    fn test_zero_nonce_is_absent() {
        let id: TransactionId = "0.0.100@1.000000000/0".parse().unwrap();
        assert_eq!(id.nonce, None);
        assert_eq!(id.to_string(), "0.0.100@1.000000000");

        let mut id = id.with_nonce(3);
        id.set_nonce(0);
        assert_eq!(id.nonce, None);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in [
            "",
            "0.0.100",
            "0.0.100@",
            "@1.000000000",
            "0.0.100@1",
            "0.0.100@1.1",
            "0.0.100@1.0000000001",
            "0.0.100@-.000000000",
            "0.0.100@--1.000000000",
            "0.0.100@+1.000000000",
            "0.0.100@1.-00000001",
            "0.0.100@1.000000000?sched",
            "0.0.100@1.000000000/2?scheduled",
            "0.0.100@1.000000000/",
            "0.0.100@1.000000000/-",
            "0.0.100@1.000000000/+2",
            "0.0.100@1.000000000/--2",
            "0.0.100@1.000000000/-2147483649",
            "0.0.100@1.000000000/2/3",
            "0.0.100@1.000000000/99999999999",
            "0.0@1.000000000",
            "0.0.100@1.000000000?scheduled?scheduled",
        ] {
            assert!(
                matches!(input.parse::<TransactionId>(), Err(IdError::MalformedTransactionId { .. })),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_negative_nonce_and_seconds_round_trip() {
        let id = TransactionId::with_valid_start(payer(), Timestamp::new(1, 0)).with_nonce(-3);
        assert_eq!(id.to_string(), "0.0.100@1.000000000/-3");
        assert_eq!(id.to_string().parse::<TransactionId>().unwrap(), id);

        let id = TransactionId::with_valid_start(payer(), Timestamp::new(-5, 0));
        assert_eq!(id.to_string(), "0.0.100@-5.000000000");
        assert_eq!(id.to_string().parse::<TransactionId>().unwrap(), id);
    }

    #[test]
    fn test_extreme_values_round_trip() {
        let id = TransactionId::with_valid_start(payer(), Timestamp::new(i64::MIN, 999_999_999))
            .with_scheduled(true)
            .with_nonce(i32::MIN);
        assert_eq!(id.to_string(), format!("0.0.100@{}.999999999?scheduled/{}", i64::MIN, i32::MIN));
        assert_eq!(id.to_string().parse::<TransactionId>().unwrap(), id);

        let id = TransactionId::with_valid_start(payer(), Timestamp::new(i64::MAX, 0))
            .with_nonce(i32::MAX);
        assert_eq!(id.to_string().parse::<TransactionId>().unwrap(), id);
    }

    #[test]
    fn test_equality_includes_scheduled_and_nonce() {
        let base = TransactionId::with_valid_start(payer(), Timestamp::new(1, 0));
        assert_ne!(base, base.with_scheduled(true));
        assert_ne!(base, base.with_nonce(1));
        assert_eq!(base, base);
    }

    #[test]
    fn test_ordering_payer_then_valid_start() {
        let a = TransactionId::with_valid_start(AccountId::new(0, 0, 1), Timestamp::new(9, 0));
        let b = TransactionId::with_valid_start(AccountId::new(0, 0, 2), Timestamp::new(1, 0));
        let c = TransactionId::with_valid_start(AccountId::new(0, 0, 2), Timestamp::new(2, 0));
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_generate_with_backdates_within_window() {
        let now = Timestamp::new(1_700_000_000, 0);
        let mut rng = StdRng::seed_from_u64(1);
        let id = TransactionId::generate_with(payer(), &FixedClock(now), &mut rng);

        assert_eq!(id.account_id, payer());
        assert!(!id.scheduled);
        assert_eq!(id.nonce, None);
        assert!(now.duration_since(&id.valid_start).unwrap() < MAX_VALID_START_JITTER);
    }

    #[test]
    fn test_serde_as_string() {
        let id: TransactionId = "0.0.3@12.000000034?scheduled".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0.0.3@12.000000034?scheduled\"");
        assert_eq!(serde_json::from_str::<TransactionId>(&json).unwrap(), id);
    }

    proptest! {
        /// Display then parse is lossless across every suffix combination.
        #[test]
        fn prop_parse_display_round_trip(
            num in any::<u64>(),
            seconds in any::<i64>(),
            nanos in 0i64..1_000_000_000,
            scheduled in any::<bool>(),
            nonce in proptest::option::of(any::<i32>()),
        ) {
            let mut id = TransactionId::with_valid_start(
                AccountId::new(0, 0, num),
                Timestamp::new(seconds, nanos),
            )
            .with_scheduled(scheduled);
            if let Some(nonce) = nonce {
                id.set_nonce(nonce);
            }

            let parsed: TransactionId = id.to_string().parse().unwrap();
            prop_assert_eq!(parsed, id);
        }
    }
}
