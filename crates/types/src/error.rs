//! Error types for identifier parsing and checksum validation using snafu.
//!
//! Two error shapes are raised by this crate, both local and never retried:
//! - [`IdError`]: a string or byte form could not be turned into an identifier.
//! - [`ChecksumError`]: an identifier carries a checksum computed for a different ledger (or a
//!   corrupted one).

use snafu::Snafu;

use crate::checksum::Checksum;

/// Malformed identifier input.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum IdError {
    /// Entity id text did not match `shard.realm.num[-checksum]`.
    #[snafu(display("malformed entity id '{input}': {reason}"))]
    MalformedEntityId {
        /// The rejected input.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Transaction id text did not match `payer@seconds.nanos[?scheduled][/nonce]`.
    #[snafu(display("malformed transaction id '{input}': {reason}"))]
    MalformedTransactionId {
        /// The rejected input.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A solidity address was not 20 bytes (40 hex characters).
    #[snafu(display("invalid solidity address '{input}': {reason}"))]
    InvalidSolidityAddress {
        /// The rejected input.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The shard does not fit the 4-byte shard field of a solidity address.
    #[snafu(display("shard {shard} does not fit in a solidity address"))]
    ShardOutOfRange {
        /// The offending shard number.
        shard: u64,
    },

    /// Ledger identity was neither a known network name nor hex bytes.
    #[snafu(display("unknown ledger id '{input}'"))]
    UnknownLedger {
        /// The rejected input.
        input: String,
    },
}

/// A checksum was present on an identifier but does not match the ledger.
///
/// Absence of a checksum is never an error; validation is then a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
#[snafu(display("checksum mismatch for {id}: expected {expected}, got {actual}"))]
pub struct ChecksumError {
    /// Canonical `shard.realm.num` form of the identifier.
    pub id: String,
    /// Checksum computed for the ledger the id was validated against.
    pub expected: Checksum,
    /// Checksum the id carried.
    pub actual: Checksum,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_error_names_both_values() {
        let err = ChecksumError {
            id: "0.0.123".to_string(),
            expected: "esxsf".parse().unwrap(),
            actual: "vfmkw".parse().unwrap(),
        };
        let message = err.to_string();
        assert!(message.contains("expected esxsf"));
        assert!(message.contains("got vfmkw"));
        assert!(message.contains("0.0.123"));
    }

    #[test]
    fn test_malformed_entity_id_display() {
        let err = MalformedEntityIdSnafu { input: "0.0", reason: "expected three segments" }.build();
        assert_eq!(err.to_string(), "malformed entity id '0.0': expected three segments");
    }
}
