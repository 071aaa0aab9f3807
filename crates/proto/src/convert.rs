//! Conversions between domain types and protobuf messages.
//!
//! Domain to proto is infallible. Proto to domain fails with [`ConvertError`] when a required
//! field is absent or holds a shape the domain type cannot represent (an account alias, an EVM
//! contract address).
//!
//! Entity numbers are `u64` in the domain and `int64` on the wire; the bits are reinterpreted
//! in both directions so every `u64` survives a round trip.

use hiero_types::{
    AccountId, ContractId, FileId, ScheduleId, Status, Timestamp, TokenId, TopicId, TransactionId,
};
use prost::Message;
use snafu::{ResultExt, Snafu};

use crate::proto;

/// Error converting a protobuf message into a domain type.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConvertError {
    /// A required field was absent.
    #[snafu(display("missing required field '{field}'"))]
    MissingField {
        /// Protobuf field name.
        field: &'static str,
    },

    /// A field held a value the domain type cannot represent.
    #[snafu(display("invalid field '{field}': {reason}"))]
    InvalidField {
        /// Protobuf field name.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The bytes were not a valid protobuf encoding.
    #[snafu(display("protobuf decode failed: {source}"))]
    Decode {
        /// Underlying prost error.
        source: prost::DecodeError,
    },
}

/// Byte-level protobuf encoding of a domain value.
pub trait ProtobufBytes: Sized {
    /// Encodes the value as its protobuf message.
    fn to_bytes(&self) -> Vec<u8>;

    /// Decodes the value from its protobuf message.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] for malformed bytes or missing required fields.
    fn from_bytes(bytes: &[u8]) -> Result<Self, ConvertError>;
}

macro_rules! impl_protobuf_bytes {
    ($($domain:ty => $message:ty),* $(,)?) => {
        $(
            impl ProtobufBytes for $domain {
                fn to_bytes(&self) -> Vec<u8> {
                    <$message>::from(*self).encode_to_vec()
                }

                fn from_bytes(bytes: &[u8]) -> Result<Self, ConvertError> {
                    let message = <$message>::decode(bytes).context(DecodeSnafu)?;
                    Self::try_from(message)
                }
            }
        )*
    };
}

impl_protobuf_bytes! {
    AccountId => proto::AccountId,
    ContractId => proto::ContractId,
    FileId => proto::FileId,
    ScheduleId => proto::ScheduleId,
    TokenId => proto::TokenId,
    TopicId => proto::TopicId,
    TransactionId => proto::TransactionId,
}

// =============================================================================
// Timestamps
// =============================================================================

impl From<Timestamp> for proto::Timestamp {
    fn from(ts: Timestamp) -> Self {
        Self { seconds: ts.seconds(), nanos: ts.nanos() }
    }
}

impl From<proto::Timestamp> for Timestamp {
    fn from(ts: proto::Timestamp) -> Self {
        Self::new(ts.seconds, i64::from(ts.nanos))
    }
}

impl From<std::time::Duration> for proto::Duration {
    fn from(duration: std::time::Duration) -> Self {
        Self { seconds: i64::try_from(duration.as_secs()).unwrap_or(i64::MAX) }
    }
}

// =============================================================================
// Entity ids
// =============================================================================

impl From<AccountId> for proto::AccountId {
    fn from(id: AccountId) -> Self {
        Self {
            shard_num: id.shard().cast_signed(),
            realm_num: id.realm().cast_signed(),
            account: Some(proto::account_id::Account::AccountNum(id.num().cast_signed())),
        }
    }
}

impl TryFrom<proto::AccountId> for AccountId {
    type Error = ConvertError;

    fn try_from(id: proto::AccountId) -> Result<Self, Self::Error> {
        match id.account {
            Some(proto::account_id::Account::AccountNum(num)) => Ok(Self::new(
                id.shard_num.cast_unsigned(),
                id.realm_num.cast_unsigned(),
                num.cast_unsigned(),
            )),
            Some(proto::account_id::Account::Alias(_)) => InvalidFieldSnafu {
                field: "AccountID.alias",
                reason: "aliased accounts have no shard.realm.num form",
            }
            .fail(),
            None => MissingFieldSnafu { field: "AccountID.account" }.fail(),
        }
    }
}

impl From<ContractId> for proto::ContractId {
    fn from(id: ContractId) -> Self {
        Self {
            shard_num: id.shard().cast_signed(),
            realm_num: id.realm().cast_signed(),
            contract: Some(proto::contract_id::Contract::ContractNum(id.num().cast_signed())),
        }
    }
}

impl TryFrom<proto::ContractId> for ContractId {
    type Error = ConvertError;

    fn try_from(id: proto::ContractId) -> Result<Self, Self::Error> {
        match id.contract {
            Some(proto::contract_id::Contract::ContractNum(num)) => Ok(Self::new(
                id.shard_num.cast_unsigned(),
                id.realm_num.cast_unsigned(),
                num.cast_unsigned(),
            )),
            Some(proto::contract_id::Contract::EvmAddress(_)) => InvalidFieldSnafu {
                field: "ContractID.evm_address",
                reason: "EVM-addressed contracts have no shard.realm.num form",
            }
            .fail(),
            None => MissingFieldSnafu { field: "ContractID.contract" }.fail(),
        }
    }
}

/// Conversions for ids whose message is a plain `(shard, realm, num)` triple.
macro_rules! impl_simple_id {
    ($($domain:ident => $message:ident . $num:ident),* $(,)?) => {
        $(
            impl From<$domain> for proto::$message {
                fn from(id: $domain) -> Self {
                    Self {
                        shard_num: id.shard().cast_signed(),
                        realm_num: id.realm().cast_signed(),
                        $num: id.num().cast_signed(),
                    }
                }
            }

            impl TryFrom<proto::$message> for $domain {
                type Error = ConvertError;

                fn try_from(id: proto::$message) -> Result<Self, Self::Error> {
                    Ok(Self::new(
                        id.shard_num.cast_unsigned(),
                        id.realm_num.cast_unsigned(),
                        id.$num.cast_unsigned(),
                    ))
                }
            }
        )*
    };
}

impl_simple_id! {
    TokenId => TokenId.token_num,
    FileId => FileId.file_num,
    TopicId => TopicId.topic_num,
    ScheduleId => ScheduleId.schedule_num,
}

// =============================================================================
// Transaction ids
// =============================================================================

impl From<TransactionId> for proto::TransactionId {
    fn from(id: TransactionId) -> Self {
        Self {
            transaction_valid_start: Some(id.valid_start.into()),
            account_id: Some(id.account_id.into()),
            scheduled: id.scheduled,
            nonce: id.nonce.unwrap_or(0),
        }
    }
}

impl TryFrom<proto::TransactionId> for TransactionId {
    type Error = ConvertError;

    fn try_from(id: proto::TransactionId) -> Result<Self, Self::Error> {
        let account_id = id
            .account_id
            .ok_or_else(|| MissingFieldSnafu { field: "TransactionID.accountID" }.build())?;
        let valid_start = id
            .transaction_valid_start
            .ok_or_else(|| MissingFieldSnafu { field: "TransactionID.transactionValidStart" }.build())?;

        let mut tx_id = Self::with_valid_start(account_id.try_into()?, valid_start.into())
            .with_scheduled(id.scheduled);
        tx_id.set_nonce(id.nonce);
        Ok(tx_id)
    }
}

// =============================================================================
// Headers
// =============================================================================

impl proto::ResponseHeader {
    /// Returns the precheck status this header carries.
    #[must_use]
    pub fn status(&self) -> Status {
        Status::from_code(self.node_transaction_precheck_code)
    }
}

impl proto::TransactionResponse {
    /// Returns the precheck status this response carries.
    #[must_use]
    pub fn status(&self) -> Status {
        Status::from_code(self.node_transaction_precheck_code)
    }
}

impl proto::TransactionReceipt {
    /// Returns the receipt status.
    #[must_use]
    pub fn receipt_status(&self) -> Status {
        Status::from_code(self.status)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_wire_bytes() {
        // shard and realm are zero and omitted; field 3 varint 3.
        assert_eq!(AccountId::new(0, 0, 3).to_bytes(), vec![0x18, 0x03]);
        assert_eq!(AccountId::from_bytes(&[0x18, 0x03]).unwrap(), AccountId::new(0, 0, 3));
    }

    #[test]
    fn test_large_num_survives_round_trip() {
        let id = TokenId::new(u64::MAX, 1 << 63, u64::MAX - 1);
        assert_eq!(TokenId::from_bytes(&id.to_bytes()).unwrap(), id);
    }

    #[test]
    fn test_transaction_id_round_trip_with_suffixes() {
        let id: TransactionId = "0.0.100@1691600000.000000001?scheduled/2".parse().unwrap();
        let bytes = id.to_bytes();
        assert_eq!(TransactionId::from_bytes(&bytes).unwrap(), id);
    }

    #[test]
    fn test_transaction_id_zero_nonce_decodes_as_absent() {
        let message = proto::TransactionId {
            transaction_valid_start: Some(proto::Timestamp { seconds: 5, nanos: 0 }),
            account_id: Some(AccountId::new(0, 0, 2).into()),
            scheduled: false,
            nonce: 0,
        };
        let id = TransactionId::try_from(message).unwrap();
        assert_eq!(id.nonce, None);
    }

    #[test]
    fn test_transaction_id_missing_fields() {
        let err = TransactionId::try_from(proto::TransactionId::default()).unwrap_err();
        assert!(matches!(err, ConvertError::MissingField { field: "TransactionID.accountID" }));

        let message = proto::TransactionId {
            account_id: Some(AccountId::new(0, 0, 2).into()),
            ..Default::default()
        };
        let err = TransactionId::try_from(message).unwrap_err();
        assert!(matches!(err, ConvertError::MissingField { .. }));
    }

    #[test]
    fn test_alias_account_rejected() {
        let message = proto::AccountId {
            shard_num: 0,
            realm_num: 0,
            account: Some(proto::account_id::Account::Alias(vec![1, 2, 3])),
        };
        assert!(matches!(AccountId::try_from(message), Err(ConvertError::InvalidField { .. })));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(matches!(TransactionId::from_bytes(&[0xff, 0xff]), Err(ConvertError::Decode { .. })));
    }

    #[test]
    fn test_response_header_extraction() {
        let response = proto::Response {
            response: Some(proto::response::Response::TransactionGetReceipt(
                proto::TransactionGetReceiptResponse {
                    header: Some(proto::ResponseHeader {
                        node_transaction_precheck_code: Status::Busy.code(),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            )),
        };

        let decoded = proto::Response::decode(response.encode_to_vec().as_slice()).unwrap();
        let header = decoded.response.as_ref().and_then(|r| r.header()).unwrap();
        assert_eq!(header.status(), Status::Busy);
    }

    #[test]
    fn test_timestamp_normalizes_nanos() {
        let ts = Timestamp::from(proto::Timestamp { seconds: 1, nanos: 1_500_000_000 });
        assert_eq!((ts.seconds(), ts.nanos()), (2, 500_000_000));
    }

    proptest::proptest! {
        /// Transaction ids survive the protobuf encoding unchanged.
        #[test]
        fn prop_transaction_id_bytes_round_trip(
            shard in proptest::prelude::any::<u64>(),
            num in proptest::prelude::any::<u64>(),
            seconds in proptest::prelude::any::<i64>(),
            nanos in 0i64..1_000_000_000,
            scheduled in proptest::prelude::any::<bool>(),
            nonce in proptest::prelude::any::<i32>(),
        ) {
            let id = TransactionId::with_valid_start(
                AccountId::new(shard, 0, num),
                Timestamp::new(seconds, nanos),
            )
            .with_scheduled(scheduled)
            .with_nonce(nonce);

            proptest::prop_assert_eq!(TransactionId::from_bytes(&id.to_bytes()).unwrap(), id);
        }
    }
}
