//! Proptest strategies for Hiero domain types.
//!
//! # Usage
//!
//! ```no_run
//! use hiero_test_utils::strategies;
//! use proptest::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn display_parses_back(id in strategies::arb_account_id()) {
//!         prop_assert_eq!(id.to_string().parse::<hiero_types::AccountId>().unwrap(), id);
//!     }
//! }
//! ```

use hiero_types::{AccountId, EntityId, LedgerId, Status, Timestamp, TransactionId};
use proptest::prelude::*;

/// Generates an entity id over the full `u64` range of each component.
pub fn arb_entity_id() -> impl Strategy<Value = EntityId> {
    (any::<u64>(), any::<u64>(), any::<u64>()).prop_map(|(s, r, n)| EntityId::new(s, r, n))
}

/// Generates an account id, biased towards the small numbers real networks use.
pub fn arb_account_id() -> impl Strategy<Value = AccountId> {
    prop_oneof![
        3 => (0u64..3, 0u64..3, 0u64..10_000).prop_map(|(s, r, n)| AccountId::new(s, r, n)),
        1 => (any::<u64>(), any::<u64>(), any::<u64>()).prop_map(|(s, r, n)| AccountId::new(s, r, n)),
    ]
}

/// Generates a timestamp with non-negative seconds and in-range nanos.
pub fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
    (0i64..=i64::from(i32::MAX), 0i64..1_000_000_000).prop_map(|(s, n)| Timestamp::new(s, n))
}

/// Generates a timestamp anywhere in the representable range, including before the epoch.
pub fn arb_any_timestamp() -> impl Strategy<Value = Timestamp> {
    (any::<i64>(), 0i64..1_000_000_000).prop_map(|(s, n)| Timestamp::new(s, n))
}

/// Generates a transaction id, sometimes scheduled, sometimes with a nonce of either sign.
///
/// Valid starts are usually realistic but can be any representable instant.
pub fn arb_transaction_id() -> impl Strategy<Value = TransactionId> {
    let start = prop_oneof![3 => arb_timestamp(), 1 => arb_any_timestamp()];
    (arb_account_id(), start, any::<bool>(), prop::option::of(any::<i32>())).prop_map(
        |(payer, start, scheduled, nonce)| {
            let id = TransactionId::with_valid_start(payer, start).with_scheduled(scheduled);
            match nonce {
                Some(nonce) => id.with_nonce(nonce),
                None => id,
            }
        },
    )
}

/// Generates one of the named ledgers or a short custom ledger id.
pub fn arb_ledger_id() -> impl Strategy<Value = LedgerId> {
    prop_oneof![
        Just(LedgerId::mainnet()),
        Just(LedgerId::testnet()),
        Just(LedgerId::previewnet()),
        prop::collection::vec(any::<u8>(), 1..8).prop_map(LedgerId::from_bytes),
    ]
}

/// Generates a status, known or not.
pub fn arb_status() -> impl Strategy<Value = Status> {
    prop_oneof![
        4 => prop::sample::select(Status::ALL),
        1 => any::<i32>().prop_map(Status::from_code),
    ]
}
