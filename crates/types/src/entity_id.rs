//! Checksummed `shard.realm.num` entity identifiers.
//!
//! [`EntityId`] is the shared representation; the typed ids ([`AccountId`], [`TokenId`],
//! [`FileId`], [`ContractId`], [`TopicId`], [`ScheduleId`]) wrap it so an account can never be
//! passed where a token is expected.
//!
//! # Formats
//!
//! - Text: `shard.realm.num`, optionally followed by `-` and a five-letter checksum.
//! - Solidity address: 20 bytes, big-endian `shard (4) ‖ realm (8) ‖ num (8)`, rendered as 40
//!   lowercase hex characters.
//!
//! A parsed checksum is carried along but never trusted: equality, hashing and ordering look
//! only at the numeric triple.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use snafu::ensure;

use crate::{
    checksum::{self, Checksum, LedgerId},
    error::{ChecksumError, IdError, InvalidSolidityAddressSnafu, MalformedEntityIdSnafu},
};

/// Length of a solidity address in bytes.
pub const SOLIDITY_ADDRESS_LEN: usize = 20;

/// A `(shard, realm, num)` triple with an optional checksum.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntityId {
    /// Shard number.
    pub shard: u64,
    /// Realm number.
    pub realm: u64,
    /// Entity number within the realm.
    pub num: u64,
    checksum: Option<Checksum>,
}

impl EntityId {
    /// Creates an entity id without a checksum.
    #[must_use]
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num, checksum: None }
    }

    /// Returns the checksum parsed alongside this id, if any.
    #[must_use]
    pub const fn checksum(&self) -> Option<Checksum> {
        self.checksum
    }

    /// Returns a copy carrying the given checksum.
    #[must_use]
    pub const fn with_checksum(mut self, checksum: Checksum) -> Self {
        self.checksum = Some(checksum);
        self
    }

    /// Computes the checksum of this id for `ledger`.
    #[must_use]
    pub fn compute_checksum(&self, ledger: &LedgerId) -> Checksum {
        checksum::compute(ledger, self.shard, self.realm, self.num)
    }

    /// Validates the attached checksum against `ledger`.
    ///
    /// An id without a checksum always validates.
    ///
    /// # Errors
    ///
    /// Returns [`ChecksumError`] naming the expected and actual checksum when they differ.
    pub fn validate_checksum(&self, ledger: &LedgerId) -> Result<(), ChecksumError> {
        let Some(actual) = self.checksum else {
            return Ok(());
        };

        let expected = self.compute_checksum(ledger);
        if expected != actual {
            return Err(ChecksumError { id: self.to_string(), expected, actual });
        }
        Ok(())
    }

    /// Renders `shard.realm.num-checksum` for `ledger`.
    #[must_use]
    pub fn to_string_with_checksum(&self, ledger: &LedgerId) -> String {
        format!("{self}-{}", self.compute_checksum(ledger))
    }

    /// Packs the triple into a 20-byte solidity address.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::ShardOutOfRange`] if the shard needs more than 4 bytes.
    pub fn to_solidity_bytes(&self) -> Result<[u8; SOLIDITY_ADDRESS_LEN], IdError> {
        let shard =
            u32::try_from(self.shard).map_err(|_| IdError::ShardOutOfRange { shard: self.shard })?;

        let mut out = [0u8; SOLIDITY_ADDRESS_LEN];
        out[..4].copy_from_slice(&shard.to_be_bytes());
        out[4..12].copy_from_slice(&self.realm.to_be_bytes());
        out[12..].copy_from_slice(&self.num.to_be_bytes());
        Ok(out)
    }

    /// Unpacks a 20-byte solidity address.
    #[must_use]
    pub fn from_solidity_bytes(bytes: &[u8; SOLIDITY_ADDRESS_LEN]) -> Self {
        let mut shard = [0u8; 4];
        let mut realm = [0u8; 8];
        let mut num = [0u8; 8];
        shard.copy_from_slice(&bytes[..4]);
        realm.copy_from_slice(&bytes[4..12]);
        num.copy_from_slice(&bytes[12..]);

        Self::new(
            u64::from(u32::from_be_bytes(shard)),
            u64::from_be_bytes(realm),
            u64::from_be_bytes(num),
        )
    }

    /// Renders the solidity address as 40 lowercase hex characters.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::ShardOutOfRange`] if the shard needs more than 4 bytes.
    pub fn to_solidity_address(&self) -> Result<String, IdError> {
        self.to_solidity_bytes().map(hex::encode)
    }

    /// Parses a 40 hex character solidity address, with or without a `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidSolidityAddress`] for wrong length or non-hex input.
    pub fn from_solidity_address(address: &str) -> Result<Self, IdError> {
        let digits = address.strip_prefix("0x").unwrap_or(address);
        ensure!(
            digits.len() == SOLIDITY_ADDRESS_LEN * 2,
            InvalidSolidityAddressSnafu {
                input: address,
                reason: format!("expected {} hex characters", SOLIDITY_ADDRESS_LEN * 2),
            }
        );

        let mut bytes = [0u8; SOLIDITY_ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes).map_err(|e| {
            InvalidSolidityAddressSnafu { input: address, reason: e.to_string() }.build()
        })?;
        Ok(Self::from_solidity_bytes(&bytes))
    }

    const fn triple(&self) -> (u64, u64, u64) {
        (self.shard, self.realm, self.num)
    }
}

impl PartialEq for EntityId {
    fn eq(&self, other: &Self) -> bool {
        self.triple() == other.triple()
    }
}

impl Eq for EntityId {}

impl Hash for EntityId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.triple().hash(state);
    }
}

impl PartialOrd for EntityId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EntityId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.triple().cmp(&other.triple())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

impl FromStr for EntityId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (triple, checksum) = match s.split_once('-') {
            Some((triple, checksum)) => (triple, Some(checksum)),
            None => (s, None),
        };

        let mut segments = triple.split('.');
        let (Some(shard), Some(realm), Some(num), None) =
            (segments.next(), segments.next(), segments.next(), segments.next())
        else {
            return MalformedEntityIdSnafu { input: s, reason: "expected shard.realm.num" }.fail();
        };

        let id = Self::new(parse_segment(s, shard)?, parse_segment(s, realm)?, parse_segment(s, num)?);

        match checksum {
            Some(checksum) => {
                let checksum = checksum.parse::<Checksum>().map_err(|_| {
                    MalformedEntityIdSnafu {
                        input: s,
                        reason: "checksum must be 5 lowercase letters",
                    }
                    .build()
                })?;
                Ok(id.with_checksum(checksum))
            },
            None => Ok(id),
        }
    }
}

/// Parses one numeric segment: ASCII digits only, within `u64`.
fn parse_segment(input: &str, segment: &str) -> Result<u64, IdError> {
    ensure!(
        !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()),
        MalformedEntityIdSnafu { input, reason: format!("'{segment}' is not a number") }
    );
    segment.parse::<u64>().map_err(|_| {
        MalformedEntityIdSnafu { input, reason: format!("'{segment}' exceeds the 64-bit range") }
            .build()
    })
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Generates a typed newtype over [`EntityId`].
///
/// Each generated type provides:
/// - Standard derives, with equality and ordering over the numeric triple
/// - Serde as the `shard.realm.num` string
/// - `From` conversions to and from [`EntityId`]
/// - `Display` / `FromStr` in the entity id text format
/// - Checksum and solidity address helpers delegating to [`EntityId`]
macro_rules! define_entity_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(EntityId);

        impl $name {
            /// Creates an id without a checksum.
            #[inline]
            #[must_use]
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self(EntityId::new(shard, realm, num))
            }

            /// Returns the shard number.
            #[inline]
            #[must_use]
            pub const fn shard(&self) -> u64 {
                self.0.shard
            }

            /// Returns the realm number.
            #[inline]
            #[must_use]
            pub const fn realm(&self) -> u64 {
                self.0.realm
            }

            /// Returns the entity number.
            #[inline]
            #[must_use]
            pub const fn num(&self) -> u64 {
                self.0.num
            }

            /// Returns the untyped entity id.
            #[inline]
            #[must_use]
            pub const fn entity_id(&self) -> EntityId {
                self.0
            }

            /// Returns the checksum parsed alongside this id, if any.
            #[must_use]
            pub const fn checksum(&self) -> Option<Checksum> {
                self.0.checksum()
            }

            /// Validates the attached checksum against `ledger`.
            ///
            /// # Errors
            ///
            /// Returns [`ChecksumError`] when a checksum is present and does not match.
            pub fn validate_checksum(&self, ledger: &LedgerId) -> Result<(), ChecksumError> {
                self.0.validate_checksum(ledger)
            }

            /// Renders `shard.realm.num-checksum` for `ledger`.
            #[must_use]
            pub fn to_string_with_checksum(&self, ledger: &LedgerId) -> String {
                self.0.to_string_with_checksum(ledger)
            }

            /// Renders the 20-byte solidity address as hex.
            ///
            /// # Errors
            ///
            /// Returns [`IdError::ShardOutOfRange`] if the shard needs more than 4 bytes.
            pub fn to_solidity_address(&self) -> Result<String, IdError> {
                self.0.to_solidity_address()
            }

            /// Parses a hex solidity address.
            ///
            /// # Errors
            ///
            /// Returns [`IdError::InvalidSolidityAddress`] for malformed input.
            pub fn from_solidity_address(address: &str) -> Result<Self, IdError> {
                EntityId::from_solidity_address(address).map(Self)
            }
        }

        impl From<EntityId> for $name {
            #[inline]
            fn from(id: EntityId) -> Self {
                Self(id)
            }
        }

        impl From<$name> for EntityId {
            #[inline]
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<EntityId>().map(Self)
            }
        }
    };
}

define_entity_id!(
    /// Identifier of an account, including the payer of a transaction and the account of a
    /// network node.
    AccountId
);

define_entity_id!(
    /// Identifier of a fungible or non-fungible token type.
    TokenId
);

define_entity_id!(
    /// Identifier of a file.
    FileId
);

define_entity_id!(
    /// Identifier of a smart contract instance.
    ContractId
);

define_entity_id!(
    /// Identifier of a consensus topic.
    TopicId
);

define_entity_id!(
    /// Identifier of a scheduled transaction.
    ScheduleId
);

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_parse_with_checksum() {
        let id: EntityId = "0.0.100-esxsf".parse().unwrap();
        assert_eq!((id.shard, id.realm, id.num), (0, 0, 100));
        assert_eq!(id.checksum().unwrap().as_str(), "esxsf");
        assert_eq!(id.to_string(), "0.0.100");
    }

    #[test]
    fn test_parse_without_checksum() {
        let id: AccountId = "1.2.3".parse().unwrap();
        assert_eq!((id.shard(), id.realm(), id.num()), (1, 2, 3));
        assert!(id.checksum().is_none());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in [
            "", "0", "0.0", "0.0.0.0", "0..1", "a.b.c", "0.0.-1", "0.0.+1", " 0.0.1", "0.0.1-",
            "0.0.1-abc", "0.0.1-ABCDE", "0.0.1-abcde-f", "0.0.18446744073709551616",
        ] {
            assert!(
                matches!(input.parse::<EntityId>(), Err(IdError::MalformedEntityId { .. })),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_accepts_u64_max() {
        let id: EntityId = "18446744073709551615.0.18446744073709551615".parse().unwrap();
        assert_eq!(id.shard, u64::MAX);
        assert_eq!(id.num, u64::MAX);
    }

    #[test]
    fn test_validate_checksum_no_checksum_is_noop() {
        let id = AccountId::new(0, 0, 123);
        assert!(id.validate_checksum(&LedgerId::mainnet()).is_ok());
        assert!(id.validate_checksum(&LedgerId::testnet()).is_ok());
    }

    #[test]
    fn test_validate_checksum_wrong_ledger() {
        let id: AccountId = "0.0.123-vfmkw".parse().unwrap();
        assert!(id.validate_checksum(&LedgerId::mainnet()).is_ok());

        let err = id.validate_checksum(&LedgerId::testnet()).unwrap_err();
        assert_eq!(err.expected.as_str(), "esxsf");
        assert_eq!(err.actual.as_str(), "vfmkw");
        assert_eq!(err.id, "0.0.123");
    }

    #[test]
    fn test_to_string_with_checksum() {
        let id = TokenId::new(0, 0, 123);
        assert_eq!(id.to_string_with_checksum(&LedgerId::previewnet()), "0.0.123-ogizo");
    }

    #[test]
    fn test_equality_ignores_checksum() {
        let with: AccountId = "0.0.123-vfmkw".parse().unwrap();
        let without = AccountId::new(0, 0, 123);
        assert_eq!(with, without);
    }

    #[test]
    fn test_ordering_is_shard_realm_num() {
        let mut ids = vec![
            EntityId::new(1, 0, 0),
            EntityId::new(0, 1, 0),
            EntityId::new(0, 0, 5),
            EntityId::new(0, 0, 1),
        ];
        ids.sort();
        assert_eq!(
            ids,
            vec![
                EntityId::new(0, 0, 1),
                EntityId::new(0, 0, 5),
                EntityId::new(0, 1, 0),
                EntityId::new(1, 0, 0),
            ]
        );
    }

    #[test]
    fn test_solidity_address_layout() {
        let id = ContractId::new(1, 2, 3);
        assert_eq!(id.to_solidity_address().unwrap(), "0000000100000000000000020000000000000003");
        assert_eq!(
            ContractId::from_solidity_address("0x0000000100000000000000020000000000000003").unwrap(),
            id
        );
    }

    #[test]
    fn test_solidity_address_rejects_large_shard() {
        let id = EntityId::new(u64::from(u32::MAX) + 1, 0, 0);
        assert!(matches!(id.to_solidity_bytes(), Err(IdError::ShardOutOfRange { .. })));
    }

    #[test]
    fn test_solidity_address_rejects_bad_input() {
        assert!(EntityId::from_solidity_address("1234").is_err());
        assert!(EntityId::from_solidity_address(&"zz".repeat(20)).is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let id = FileId::new(0, 0, 150);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"0.0.150\"");
        assert_eq!(serde_json::from_str::<FileId>(&json).unwrap(), id);
        assert!(serde_json::from_str::<FileId>("\"0.0\"").is_err());
    }

    fn arb_entity_id() -> impl Strategy<Value = EntityId> {
        (any::<u64>(), any::<u64>(), any::<u64>()).prop_map(|(s, r, n)| EntityId::new(s, r, n))
    }

    proptest! {
        /// Display then parse yields the same triple.
        #[test]
        fn prop_parse_display_round_trip(id in arb_entity_id()) {
            let parsed: EntityId = id.to_string().parse().unwrap();
            prop_assert_eq!(parsed, id);
        }

        /// A freshly computed checksum always validates; flipping any letter breaks it.
        #[test]
        fn prop_checksum_validates_and_detects_mutation(
            id in arb_entity_id(),
            position in 0usize..5,
            shift in 1u8..26,
        ) {
            let ledger = LedgerId::testnet();
            let rendered = id.to_string_with_checksum(&ledger);
            let parsed: EntityId = rendered.parse().unwrap();
            prop_assert!(parsed.validate_checksum(&ledger).is_ok());

            let mut letters = parsed.checksum().unwrap().as_str().as_bytes().to_vec();
            letters[position] = b'a' + (letters[position] - b'a' + shift) % 26;
            let mutated: Checksum = std::str::from_utf8(&letters).unwrap().parse().unwrap();
            prop_assert!(id.with_checksum(mutated).validate_checksum(&ledger).is_err());
        }

        /// Any 20 bytes survive unpack then pack unchanged.
        #[test]
        fn prop_solidity_bytes_round_trip(bytes in any::<[u8; 20]>()) {
            let id = EntityId::from_solidity_bytes(&bytes);
            prop_assert_eq!(id.to_solidity_bytes().unwrap(), bytes);
        }
    }
}
