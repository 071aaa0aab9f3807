//! Property tests over the shared generators for ids and ledgers.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use hiero_test_utils::strategies::{arb_account_id, arb_ledger_id, arb_transaction_id};
use hiero_types::{AccountId, LedgerId, TransactionId};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_transaction_id_display_parse_round_trip(id in arb_transaction_id()) {
        let parsed: TransactionId = id.to_string().parse().unwrap();
        prop_assert_eq!(parsed, id);
    }

    #[test]
    fn prop_transaction_id_serde_round_trip(id in arb_transaction_id()) {
        let json = serde_json::to_string(&id).unwrap();
        prop_assert_eq!(serde_json::from_str::<TransactionId>(&json).unwrap(), id);
    }

    #[test]
    fn prop_transaction_id_checksum_form_validates(
        id in arb_transaction_id(),
        ledger in arb_ledger_id(),
    ) {
        let parsed: TransactionId = id.to_string_with_checksum(&ledger).parse().unwrap();
        prop_assert_eq!(parsed, id);
        prop_assert!(parsed.account_id.validate_checksum(&ledger).is_ok());
    }

    #[test]
    fn prop_ledger_id_display_parse_round_trip(ledger in arb_ledger_id()) {
        let parsed: LedgerId = ledger.to_string().parse().unwrap();
        prop_assert_eq!(parsed, ledger);
    }

    #[test]
    fn prop_checksum_rejected_on_other_ledger(account in arb_account_id()) {
        let text = account.to_string_with_checksum(&LedgerId::mainnet());
        let parsed: AccountId = text.parse().unwrap();
        prop_assert!(parsed.validate_checksum(&LedgerId::mainnet()).is_ok());
        prop_assume!(
            account.to_string_with_checksum(&LedgerId::testnet()) != text
        );
        prop_assert!(parsed.validate_checksum(&LedgerId::testnet()).is_err());
    }
}
