//! Fuzz target for the textual id parsers.
//!
//! Arbitrary strings fed to the entity id, transaction id and ledger id parsers must either
//! fail cleanly or produce a value whose display form parses back to the same value.

#![no_main]

use hiero_types::{AccountId, EntityId, LedgerId, TransactionId};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(id) = input.parse::<EntityId>() {
        let reparsed: EntityId = id.to_string().parse().unwrap();
        assert_eq!(reparsed, id);
        let _ = id.to_solidity_address();
        let _ = id.validate_checksum(&LedgerId::mainnet());
    }

    if let Ok(id) = input.parse::<AccountId>() {
        let with_checksum = id.to_string_with_checksum(&LedgerId::testnet());
        let reparsed: AccountId = with_checksum.parse().unwrap();
        assert!(reparsed.validate_checksum(&LedgerId::testnet()).is_ok());
    }

    if let Ok(id) = input.parse::<TransactionId>() {
        let reparsed: TransactionId = id.to_string().parse().unwrap();
        assert_eq!(reparsed, id);
    }

    let _ = input.parse::<LedgerId>();
    let _ = EntityId::from_solidity_address(input);
});
