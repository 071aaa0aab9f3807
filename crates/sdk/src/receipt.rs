//! Receipts and records: the outcome of a transaction once the ledger has executed it.

use hiero_proto::{ConvertError, proto};
use hiero_types::{
    AccountId, ContractId, FileId, ScheduleId, Status, Timestamp, TokenId, TopicId, TransactionId,
};

use crate::error::{DecodeSnafu, ReceiptStatusSnafu, Result, SdkError};

/// Summary of a transaction's execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    /// Outcome of the transaction.
    pub status: Status,
    /// Transaction this receipt belongs to.
    pub transaction_id: Option<TransactionId>,
    /// Account created by the transaction.
    pub account_id: Option<AccountId>,
    /// File created by the transaction.
    pub file_id: Option<FileId>,
    /// Contract created by the transaction.
    pub contract_id: Option<ContractId>,
    /// Topic created by the transaction.
    pub topic_id: Option<TopicId>,
    /// Token created by the transaction.
    pub token_id: Option<TokenId>,
    /// Schedule created by the transaction.
    pub schedule_id: Option<ScheduleId>,
    /// Id of the transaction a schedule create will execute.
    pub scheduled_transaction_id: Option<TransactionId>,
    /// Sequence number of a topic message submission.
    pub topic_sequence_number: u64,
    /// Running hash of a topic after a message submission.
    pub topic_running_hash: Vec<u8>,
    /// Token supply after a mint or burn.
    pub total_supply: u64,
    /// Serial numbers of minted NFTs.
    pub serials: Vec<i64>,
    /// Receipts of duplicate submissions, when requested.
    pub duplicates: Vec<TransactionReceipt>,
    /// Receipts of child transactions, when requested.
    pub children: Vec<TransactionReceipt>,
}

impl TransactionReceipt {
    /// Converts a protobuf receipt.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] if an embedded id has a shape the domain cannot represent.
    pub fn from_proto(
        receipt: proto::TransactionReceipt,
        transaction_id: Option<TransactionId>,
    ) -> Result<Self, ConvertError> {
        Ok(Self {
            status: receipt.receipt_status(),
            transaction_id,
            account_id: receipt.account_id.map(TryInto::try_into).transpose()?,
            file_id: receipt.file_id.map(TryInto::try_into).transpose()?,
            contract_id: receipt.contract_id.map(TryInto::try_into).transpose()?,
            topic_id: receipt.topic_id.map(TryInto::try_into).transpose()?,
            token_id: receipt.token_id.map(TryInto::try_into).transpose()?,
            schedule_id: receipt.schedule_id.map(TryInto::try_into).transpose()?,
            scheduled_transaction_id: receipt
                .scheduled_transaction_id
                .map(TryInto::try_into)
                .transpose()?,
            topic_sequence_number: receipt.topic_sequence_number,
            topic_running_hash: receipt.topic_running_hash,
            total_supply: receipt.new_total_supply,
            serials: receipt.serial_numbers,
            duplicates: Vec::new(),
            children: Vec::new(),
        })
    }

    /// Fails with [`SdkError::ReceiptStatus`] unless the status is `SUCCESS`.
    ///
    /// # Errors
    ///
    /// Returns the receipt status as an error when it is not `SUCCESS`.
    pub fn validate_status(self) -> Result<Self> {
        if self.status == Status::Success {
            Ok(self)
        } else {
            ReceiptStatusSnafu { status: self.status, transaction_id: self.transaction_id }.fail()
        }
    }
}

/// One hbar movement in a record's transfer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    /// Account debited or credited.
    pub account_id: AccountId,
    /// Amount in tinybars; negative for debits.
    pub amount: i64,
    /// Whether the movement used an allowance.
    pub is_approval: bool,
}

/// Full record of a transaction's execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Receipt embedded in the record.
    pub receipt: TransactionReceipt,
    /// SHA-384 of the signed transaction.
    pub transaction_hash: Vec<u8>,
    /// Consensus time of the transaction.
    pub consensus_timestamp: Option<Timestamp>,
    /// Transaction this record belongs to.
    pub transaction_id: Option<TransactionId>,
    /// Memo from the transaction body.
    pub memo: String,
    /// Fee charged, in tinybars.
    pub transaction_fee: u64,
    /// Hbar movements.
    pub transfers: Vec<Transfer>,
    /// Schedule that executed this transaction.
    pub schedule_ref: Option<ScheduleId>,
    /// Records of duplicate submissions, when requested.
    pub duplicates: Vec<TransactionRecord>,
    /// Records of child transactions, when requested.
    pub children: Vec<TransactionRecord>,
}

impl TransactionRecord {
    /// Converts a protobuf record.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError`] if the receipt is missing or an embedded id cannot be converted.
    pub fn from_proto(record: proto::TransactionRecord) -> Result<Self, ConvertError> {
        let transaction_id: Option<TransactionId> =
            record.transaction_id.map(TryInto::try_into).transpose()?;
        let receipt = record
            .receipt
            .ok_or_else(|| hiero_proto::convert::MissingFieldSnafu { field: "TransactionRecord.receipt" }.build())?;

        let transfers = record
            .transfer_list
            .map(|list| list.account_amounts)
            .unwrap_or_default()
            .into_iter()
            .map(|amount| {
                let account_id = amount
                    .account_id
                    .ok_or_else(|| {
                        hiero_proto::convert::MissingFieldSnafu { field: "AccountAmount.accountID" }.build()
                    })?
                    .try_into()?;
                Ok(Transfer { account_id, amount: amount.amount, is_approval: amount.is_approval })
            })
            .collect::<Result<Vec<_>, ConvertError>>()?;

        Ok(Self {
            receipt: TransactionReceipt::from_proto(receipt, transaction_id)?,
            transaction_hash: record.transaction_hash,
            consensus_timestamp: record.consensus_timestamp.map(Timestamp::from),
            transaction_id,
            memo: record.memo,
            transaction_fee: record.transaction_fee,
            transfers,
            schedule_ref: record.schedule_ref.map(TryInto::try_into).transpose()?,
            duplicates: Vec::new(),
            children: Vec::new(),
        })
    }

    /// Fails with [`SdkError::ReceiptStatus`] unless the embedded receipt is `SUCCESS`.
    ///
    /// # Errors
    ///
    /// Returns the receipt status as an error when it is not `SUCCESS`.
    pub fn validate_status(self) -> Result<Self> {
        if self.receipt.status == Status::Success {
            Ok(self)
        } else {
            ReceiptStatusSnafu { status: self.receipt.status, transaction_id: self.transaction_id }
                .fail()
        }
    }
}

pub(crate) fn convert_error(err: ConvertError) -> SdkError {
    DecodeSnafu { message: err.to_string() }.build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn tx_id() -> TransactionId {
        TransactionId::with_valid_start(AccountId::new(0, 0, 1001), Timestamp::new(1_700_000_000, 7))
    }

    #[test]
    fn test_receipt_from_proto() {
        let receipt = proto::TransactionReceipt {
            status: Status::Success.code(),
            account_id: Some(AccountId::new(0, 0, 5005).into()),
            topic_sequence_number: 9,
            serial_numbers: vec![1, 2],
            ..Default::default()
        };

        let receipt = TransactionReceipt::from_proto(receipt, Some(tx_id())).unwrap();
        assert_eq!(receipt.status, Status::Success);
        assert_eq!(receipt.account_id, Some(AccountId::new(0, 0, 5005)));
        assert_eq!(receipt.topic_sequence_number, 9);
        assert_eq!(receipt.serials, vec![1, 2]);
        assert_eq!(receipt.transaction_id, Some(tx_id()));
    }

    #[test]
    fn test_receipt_validate_status() {
        let ok = proto::TransactionReceipt { status: Status::Success.code(), ..Default::default() };
        assert!(TransactionReceipt::from_proto(ok, None).unwrap().validate_status().is_ok());

        let failed = proto::TransactionReceipt {
            status: Status::InsufficientPayerBalance.code(),
            ..Default::default()
        };
        let err = TransactionReceipt::from_proto(failed, Some(tx_id()))
            .unwrap()
            .validate_status()
            .unwrap_err();
        assert!(matches!(
            err,
            SdkError::ReceiptStatus { status: Status::InsufficientPayerBalance, transaction_id: Some(_) }
        ));
    }

    #[test]
    fn test_record_from_proto() {
        let record = proto::TransactionRecord {
            receipt: Some(proto::TransactionReceipt {
                status: Status::Success.code(),
                ..Default::default()
            }),
            transaction_hash: vec![7; 48],
            consensus_timestamp: Some(proto::Timestamp { seconds: 10, nanos: 5 }),
            transaction_id: Some(tx_id().into()),
            memo: "memo".to_owned(),
            transaction_fee: 100,
            transfer_list: Some(proto::TransferList {
                account_amounts: vec![proto::AccountAmount {
                    account_id: Some(AccountId::new(0, 0, 98).into()),
                    amount: 10,
                    is_approval: false,
                }],
            }),
            schedule_ref: None,
        };

        let record = TransactionRecord::from_proto(record).unwrap();
        assert_eq!(record.receipt.transaction_id, Some(tx_id()));
        assert_eq!(record.consensus_timestamp, Some(Timestamp::new(10, 5)));
        assert_eq!(record.transfers[0].account_id, AccountId::new(0, 0, 98));
        assert_eq!(record.transaction_fee, 100);
    }

    #[test]
    fn test_record_requires_receipt() {
        let err = TransactionRecord::from_proto(proto::TransactionRecord::default()).unwrap_err();
        assert!(matches!(err, ConvertError::MissingField { field: "TransactionRecord.receipt" }));
    }
}
