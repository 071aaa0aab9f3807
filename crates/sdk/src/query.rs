//! Read-only requests: receipt and record lookups.
//!
//! Both queries poll. A node answers `UNKNOWN` or `RECEIPT_NOT_FOUND` while the transaction
//! is still pending, so those outcomes retry against the same node until the receipt is final,
//! the attempt budget runs out, or the deadline passes.

use std::{fmt, future::Future};

use bytes::Bytes;
use hiero_proto::proto;
use hiero_types::{AccountId, ChecksumError, LedgerId, Status, TransactionId};
use prost::Message;

use crate::{
    Client,
    classifier::{Outcome, classify},
    error::{DecodeSnafu, Result},
    receipt::{TransactionReceipt, TransactionRecord, convert_error},
    request::{AttemptContext, RequestKind, Requestable, ResponseHeader},
    signer::SignaturePair,
};

/// gRPC method serving receipt lookups.
pub const RECEIPT_METHOD: &str = "/proto.CryptoService/getTransactionReceipts";

/// gRPC method serving record lookups.
pub const RECORD_METHOD: &str = "/proto.CryptoService/getTxRecordByTxID";

/// Header statuses that mean "ask the same node again" for a receipt or record lookup.
fn classify_query_header(status: Status) -> Option<Outcome> {
    match status.normalized() {
        Status::Busy
        | Status::Unknown
        | Status::ReceiptNotFound
        | Status::RecordNotFound
        | Status::PlatformNotActive => Some(Outcome::RetryableSameNode),
        Status::Ok => None,
        other => Some(classify(other)),
    }
}

/// Receipt statuses that mean the transaction has not reached consensus yet.
const fn is_pending_receipt(status: Status) -> bool {
    matches!(
        status.normalized(),
        Status::Unknown
            | Status::Busy
            | Status::Ok
            | Status::ReceiptNotFound
            | Status::RecordNotFound
            | Status::PlatformNotActive
    )
}

fn decode_response(bytes: &[u8]) -> Result<proto::response::Response> {
    proto::Response::decode(bytes)
        .map_err(|err| DecodeSnafu { message: format!("Response: {err}") }.build())?
        .response
        .ok_or_else(|| DecodeSnafu { message: "Response carries no variant" }.build())
}

fn header_of(response: &proto::response::Response) -> Result<ResponseHeader> {
    let header = response
        .header()
        .ok_or_else(|| DecodeSnafu { message: "Response carries no header" }.build())?;
    Ok(ResponseHeader { status: header.status(), cost: header.cost })
}

fn answer_only() -> Option<proto::QueryHeader> {
    Some(proto::QueryHeader { payment: None, response_type: proto::ResponseType::AnswerOnly.into() })
}

fn validate_query_checksums(
    transaction_id: &TransactionId,
    nodes: Option<&[AccountId]>,
    ledger: &LedgerId,
) -> Result<(), ChecksumError> {
    transaction_id.account_id.validate_checksum(ledger)?;
    for node in nodes.unwrap_or_default() {
        node.validate_checksum(ledger)?;
    }
    Ok(())
}

/// Fetches the receipt of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceiptQuery {
    transaction_id: TransactionId,
    node_account_ids: Option<Vec<AccountId>>,
    include_duplicates: bool,
    include_children: bool,
    validate_status: bool,
}

impl TransactionReceiptQuery {
    /// Creates a receipt lookup that fails on a non-`SUCCESS` receipt.
    #[must_use]
    pub fn new(transaction_id: TransactionId) -> Self {
        Self {
            transaction_id,
            node_account_ids: None,
            include_duplicates: false,
            include_children: false,
            validate_status: true,
        }
    }

    /// Restricts the lookup to these nodes.
    #[must_use]
    pub fn with_node_account_ids(mut self, nodes: impl IntoIterator<Item = AccountId>) -> Self {
        self.node_account_ids = Some(nodes.into_iter().collect());
        self
    }

    /// Also returns receipts of duplicate submissions.
    #[must_use]
    pub fn with_include_duplicates(mut self, include: bool) -> Self {
        self.include_duplicates = include;
        self
    }

    /// Also returns receipts of child transactions.
    #[must_use]
    pub fn with_include_children(mut self, include: bool) -> Self {
        self.include_children = include;
        self
    }

    /// Whether a final non-`SUCCESS` receipt is returned as an error. Defaults to true.
    #[must_use]
    pub fn with_validate_status(mut self, validate: bool) -> Self {
        self.validate_status = validate;
        self
    }

    /// Returns the transaction being looked up.
    #[must_use]
    pub fn target(&self) -> TransactionId {
        self.transaction_id
    }

    /// Encodes the query as a protobuf `Query`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_proto().encode_to_vec()
    }

    fn to_proto(&self) -> proto::Query {
        proto::Query {
            query: Some(proto::query::Query::TransactionGetReceipt(proto::TransactionGetReceiptQuery {
                header: answer_only(),
                transaction_id: Some(self.transaction_id.into()),
                include_duplicates: self.include_duplicates,
                include_child_receipts: self.include_children,
            })),
        }
    }

    fn from_proto(query: proto::TransactionGetReceiptQuery) -> Result<Self> {
        let transaction_id = query
            .transaction_id
            .ok_or_else(|| DecodeSnafu { message: "receipt query without a transaction id" }.build())?
            .try_into()
            .map_err(convert_error)?;
        Ok(Self::new(transaction_id)
            .with_include_duplicates(query.include_duplicates)
            .with_include_children(query.include_child_receipts))
    }

    /// Executes the lookup.
    ///
    /// # Errors
    ///
    /// See [`Client::execute_with_token`].
    pub async fn execute(&mut self, client: &Client) -> Result<TransactionReceipt> {
        client.execute(self).await
    }
}

impl Requestable for TransactionReceiptQuery {
    type Output = TransactionReceipt;

    fn operation(&self) -> &'static str {
        "TransactionReceiptQuery"
    }

    fn method(&self) -> &'static str {
        RECEIPT_METHOD
    }

    fn kind(&self) -> RequestKind {
        RequestKind::Query
    }

    fn transaction_id(&self) -> Option<TransactionId> {
        Some(self.transaction_id)
    }

    fn node_account_ids(&self) -> Option<&[AccountId]> {
        self.node_account_ids.as_deref()
    }

    fn freeze(&mut self, _transaction_id: Option<&TransactionId>, _node: &AccountId) -> Result<Bytes> {
        Ok(Bytes::from(self.to_bytes()))
    }

    fn encode(&self, body: &Bytes, _signatures: &[SignaturePair]) -> Result<Bytes> {
        Ok(body.clone())
    }

    fn decode_header(&self, response: &[u8]) -> Result<ResponseHeader> {
        header_of(&decode_response(response)?)
    }

    fn classify(&self, header: &ResponseHeader, response: &[u8]) -> Outcome {
        if let Some(outcome) = classify_query_header(header.status) {
            return outcome;
        }
        match decode_response(response) {
            Ok(proto::response::Response::TransactionGetReceipt(answer))
                if answer.receipt.as_ref().is_some_and(|r| is_pending_receipt(r.receipt_status())) =>
            {
                Outcome::RetryableSameNode
            },
            _ => Outcome::Success,
        }
    }

    fn map_response(&self, response: &[u8], _context: &AttemptContext<'_>) -> Result<TransactionReceipt> {
        let proto::response::Response::TransactionGetReceipt(answer) = decode_response(response)?
        else {
            return DecodeSnafu { message: "expected a receipt response" }.fail();
        };
        let receipt = answer
            .receipt
            .ok_or_else(|| DecodeSnafu { message: "receipt response without a receipt" }.build())?;

        let convert = |r| TransactionReceipt::from_proto(r, Some(self.transaction_id)).map_err(convert_error);
        let mut receipt = convert(receipt)?;
        receipt.duplicates =
            answer.duplicate_transaction_receipts.into_iter().map(convert).collect::<Result<_>>()?;
        receipt.children =
            answer.child_transaction_receipts.into_iter().map(convert).collect::<Result<_>>()?;

        if self.validate_status { receipt.validate_status() } else { Ok(receipt) }
    }

    fn validate_checksums(&self, ledger: &LedgerId) -> Result<(), ChecksumError> {
        validate_query_checksums(&self.transaction_id, self.node_account_ids.as_deref(), ledger)
    }
}

/// Fetches the record of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecordQuery {
    transaction_id: TransactionId,
    node_account_ids: Option<Vec<AccountId>>,
    include_duplicates: bool,
    include_children: bool,
    validate_status: bool,
}

impl TransactionRecordQuery {
    /// Creates a record lookup that fails on a non-`SUCCESS` receipt.
    #[must_use]
    pub fn new(transaction_id: TransactionId) -> Self {
        Self {
            transaction_id,
            node_account_ids: None,
            include_duplicates: false,
            include_children: false,
            validate_status: true,
        }
    }

    /// Restricts the lookup to these nodes.
    #[must_use]
    pub fn with_node_account_ids(mut self, nodes: impl IntoIterator<Item = AccountId>) -> Self {
        self.node_account_ids = Some(nodes.into_iter().collect());
        self
    }

    /// Also returns records of duplicate submissions.
    #[must_use]
    pub fn with_include_duplicates(mut self, include: bool) -> Self {
        self.include_duplicates = include;
        self
    }

    /// Also returns records of child transactions.
    #[must_use]
    pub fn with_include_children(mut self, include: bool) -> Self {
        self.include_children = include;
        self
    }

    /// Whether a non-`SUCCESS` receipt in the record is returned as an error. Defaults to true.
    #[must_use]
    pub fn with_validate_status(mut self, validate: bool) -> Self {
        self.validate_status = validate;
        self
    }

    /// Returns the transaction being looked up.
    #[must_use]
    pub fn target(&self) -> TransactionId {
        self.transaction_id
    }

    /// Encodes the query as a protobuf `Query`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_proto().encode_to_vec()
    }

    fn to_proto(&self) -> proto::Query {
        proto::Query {
            query: Some(proto::query::Query::TransactionGetRecord(proto::TransactionGetRecordQuery {
                header: answer_only(),
                transaction_id: Some(self.transaction_id.into()),
                include_duplicates: self.include_duplicates,
                include_child_records: self.include_children,
            })),
        }
    }

    fn from_proto(query: proto::TransactionGetRecordQuery) -> Result<Self> {
        let transaction_id = query
            .transaction_id
            .ok_or_else(|| DecodeSnafu { message: "record query without a transaction id" }.build())?
            .try_into()
            .map_err(convert_error)?;
        Ok(Self::new(transaction_id)
            .with_include_duplicates(query.include_duplicates)
            .with_include_children(query.include_child_records))
    }

    /// Executes the lookup.
    ///
    /// # Errors
    ///
    /// See [`Client::execute_with_token`].
    pub async fn execute(&mut self, client: &Client) -> Result<TransactionRecord> {
        client.execute(self).await
    }
}

impl Requestable for TransactionRecordQuery {
    type Output = TransactionRecord;

    fn operation(&self) -> &'static str {
        "TransactionRecordQuery"
    }

    fn method(&self) -> &'static str {
        RECORD_METHOD
    }

    fn kind(&self) -> RequestKind {
        RequestKind::Query
    }

    fn transaction_id(&self) -> Option<TransactionId> {
        Some(self.transaction_id)
    }

    fn node_account_ids(&self) -> Option<&[AccountId]> {
        self.node_account_ids.as_deref()
    }

    fn freeze(&mut self, _transaction_id: Option<&TransactionId>, _node: &AccountId) -> Result<Bytes> {
        Ok(Bytes::from(self.to_bytes()))
    }

    fn encode(&self, body: &Bytes, _signatures: &[SignaturePair]) -> Result<Bytes> {
        Ok(body.clone())
    }

    fn decode_header(&self, response: &[u8]) -> Result<ResponseHeader> {
        header_of(&decode_response(response)?)
    }

    fn classify(&self, header: &ResponseHeader, response: &[u8]) -> Outcome {
        if let Some(outcome) = classify_query_header(header.status) {
            return outcome;
        }
        match decode_response(response) {
            Ok(proto::response::Response::TransactionGetRecord(answer))
                if answer
                    .transaction_record
                    .as_ref()
                    .and_then(|r| r.receipt.as_ref())
                    .is_some_and(|r| is_pending_receipt(r.receipt_status())) =>
            {
                Outcome::RetryableSameNode
            },
            _ => Outcome::Success,
        }
    }

    fn map_response(&self, response: &[u8], _context: &AttemptContext<'_>) -> Result<TransactionRecord> {
        let proto::response::Response::TransactionGetRecord(answer) = decode_response(response)? else {
            return DecodeSnafu { message: "expected a record response" }.fail();
        };
        let record = answer
            .transaction_record
            .ok_or_else(|| DecodeSnafu { message: "record response without a record" }.build())?;

        let convert = |r| TransactionRecord::from_proto(r).map_err(convert_error);
        let mut record = convert(record)?;
        record.duplicates =
            answer.duplicate_transaction_records.into_iter().map(convert).collect::<Result<_>>()?;
        record.children =
            answer.child_transaction_records.into_iter().map(convert).collect::<Result<_>>()?;

        if self.validate_status { record.validate_status() } else { Ok(record) }
    }

    fn validate_checksums(&self, ledger: &LedgerId) -> Result<(), ChecksumError> {
        validate_query_checksums(&self.transaction_id, self.node_account_ids.as_deref(), ledger)
    }
}

/// A query decoded from bytes whose variant is only known at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyQuery {
    /// Receipt lookup.
    TransactionReceipt(TransactionReceiptQuery),
    /// Record lookup.
    TransactionRecord(TransactionRecordQuery),
}

/// Result of executing an [`AnyQuery`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyQueryResponse {
    /// Receipt lookup result.
    TransactionReceipt(TransactionReceipt),
    /// Record lookup result.
    TransactionRecord(Box<TransactionRecord>),
}

impl AnyQuery {
    /// Decodes a protobuf `Query`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Decode`](crate::SdkError::Decode) for malformed bytes or a query
    /// variant this client does not know.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let query = proto::Query::decode(bytes)
            .map_err(|err| DecodeSnafu { message: format!("Query: {err}") }.build())?;
        match query.query {
            Some(proto::query::Query::TransactionGetReceipt(q)) => {
                Ok(Self::TransactionReceipt(TransactionReceiptQuery::from_proto(q)?))
            },
            Some(proto::query::Query::TransactionGetRecord(q)) => {
                Ok(Self::TransactionRecord(TransactionRecordQuery::from_proto(q)?))
            },
            None => DecodeSnafu { message: "unsupported query variant" }.fail(),
        }
    }

    /// Encodes the query as a protobuf `Query`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::TransactionReceipt(q) => q.to_bytes(),
            Self::TransactionRecord(q) => q.to_bytes(),
        }
    }

}

macro_rules! delegate {
    ($self:expr, $q:ident => $body:expr) => {
        match $self {
            AnyQuery::TransactionReceipt($q) => $body,
            AnyQuery::TransactionRecord($q) => $body,
        }
    };
}

impl Requestable for AnyQuery {
    type Output = AnyQueryResponse;

    fn operation(&self) -> &'static str {
        delegate!(self, q => q.operation())
    }

    fn method(&self) -> &'static str {
        delegate!(self, q => q.method())
    }

    fn kind(&self) -> RequestKind {
        RequestKind::Query
    }

    fn transaction_id(&self) -> Option<TransactionId> {
        delegate!(self, q => q.transaction_id())
    }

    fn node_account_ids(&self) -> Option<&[AccountId]> {
        delegate!(self, q => q.node_account_ids())
    }

    fn freeze(&mut self, transaction_id: Option<&TransactionId>, node: &AccountId) -> Result<Bytes> {
        delegate!(self, q => q.freeze(transaction_id, node))
    }

    fn encode(&self, body: &Bytes, signatures: &[SignaturePair]) -> Result<Bytes> {
        delegate!(self, q => q.encode(body, signatures))
    }

    fn decode_header(&self, response: &[u8]) -> Result<ResponseHeader> {
        delegate!(self, q => q.decode_header(response))
    }

    fn classify(&self, header: &ResponseHeader, response: &[u8]) -> Outcome {
        delegate!(self, q => q.classify(header, response))
    }

    fn map_response(&self, response: &[u8], context: &AttemptContext<'_>) -> Result<AnyQueryResponse> {
        match self {
            Self::TransactionReceipt(q) => {
                q.map_response(response, context).map(AnyQueryResponse::TransactionReceipt)
            },
            Self::TransactionRecord(q) => q
                .map_response(response, context)
                .map(|record| AnyQueryResponse::TransactionRecord(Box::new(record))),
        }
    }

    fn validate_checksums(&self, ledger: &LedgerId) -> Result<(), ChecksumError> {
        delegate!(self, q => q.validate_checksums(ledger))
    }
}

/// Builds the receipt lookup used when a response or id is asked for its receipt.
pub trait ReceiptQueryFactory: Send + Sync + fmt::Debug {
    /// Returns the lookup for `transaction_id`.
    fn receipt_query(&self, transaction_id: TransactionId) -> TransactionReceiptQuery;
}

/// Builds the record lookup used when a response or id is asked for its record.
pub trait RecordQueryFactory: Send + Sync + fmt::Debug {
    /// Returns the lookup for `transaction_id`.
    fn record_query(&self, transaction_id: TransactionId) -> TransactionRecordQuery;
}

/// Plain lookups with status validation on.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultQueryFactory;

impl ReceiptQueryFactory for DefaultQueryFactory {
    fn receipt_query(&self, transaction_id: TransactionId) -> TransactionReceiptQuery {
        TransactionReceiptQuery::new(transaction_id)
    }
}

impl RecordQueryFactory for DefaultQueryFactory {
    fn record_query(&self, transaction_id: TransactionId) -> TransactionRecordQuery {
        TransactionRecordQuery::new(transaction_id)
    }
}

/// Receipt and record lookups keyed by transaction id alone.
pub trait TransactionIdExt {
    /// Polls any network node for the receipt until it is final.
    fn get_receipt(&self, client: &Client) -> impl Future<Output = Result<TransactionReceipt>> + Send;

    /// Waits for a successful receipt, then fetches the record.
    fn get_record(&self, client: &Client) -> impl Future<Output = Result<TransactionRecord>> + Send;
}

impl TransactionIdExt for TransactionId {
    async fn get_receipt(&self, client: &Client) -> Result<TransactionReceipt> {
        let mut query = client.config().receipt_factory.receipt_query(*self);
        client.execute(&mut query).await
    }

    async fn get_record(&self, client: &Client) -> Result<TransactionRecord> {
        self.get_receipt(client).await?;
        let mut query = client.config().record_factory.record_query(*self);
        client.execute(&mut query).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use hiero_types::Timestamp;

    use super::*;
    use crate::error::SdkError;

    fn tx_id() -> TransactionId {
        TransactionId::with_valid_start(AccountId::new(0, 0, 1001), Timestamp::new(1_700_000_000, 3))
    }

    fn receipt_response(precheck: Status, receipt: Option<Status>) -> Vec<u8> {
        proto::Response {
            response: Some(proto::response::Response::TransactionGetReceipt(
                proto::TransactionGetReceiptResponse {
                    header: Some(proto::ResponseHeader {
                        node_transaction_precheck_code: precheck.code(),
                        ..Default::default()
                    }),
                    receipt: receipt.map(|status| proto::TransactionReceipt {
                        status: status.code(),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            )),
        }
        .encode_to_vec()
    }

    fn outcome(query: &TransactionReceiptQuery, bytes: &[u8]) -> Outcome {
        let header = query.decode_header(bytes).unwrap();
        query.classify(&header, bytes)
    }

    #[test]
    fn test_pending_header_statuses_poll_same_node() {
        let query = TransactionReceiptQuery::new(tx_id());
        for status in [
            Status::Busy,
            Status::Unknown,
            Status::ReceiptNotFound,
            Status::RecordNotFound,
            Status::PlatformNotActive,
        ] {
            assert_eq!(outcome(&query, &receipt_response(status, None)), Outcome::RetryableSameNode);
        }
    }

    #[test]
    fn test_pending_receipt_polls_same_node() {
        let query = TransactionReceiptQuery::new(tx_id());
        let bytes = receipt_response(Status::Ok, Some(Status::Unknown));
        assert_eq!(outcome(&query, &bytes), Outcome::RetryableSameNode);
    }

    #[test]
    fn test_final_receipt_is_success_even_when_failed() {
        let query = TransactionReceiptQuery::new(tx_id());
        let bytes = receipt_response(Status::Ok, Some(Status::InsufficientPayerBalance));
        assert_eq!(outcome(&query, &bytes), Outcome::Success);
    }

    #[test]
    fn test_other_header_status_uses_table() {
        let query = TransactionReceiptQuery::new(tx_id());
        assert_eq!(outcome(&query, &receipt_response(Status::InvalidSignature, None)), Outcome::Fatal);
    }

    #[test]
    fn test_map_response_validates_status() {
        let request = Bytes::new();
        let context =
            AttemptContext { node: AccountId::new(0, 0, 3), transaction_id: None, attempt: 1, request: &request };
        let bytes = receipt_response(Status::Ok, Some(Status::InsufficientPayerBalance));

        let err = TransactionReceiptQuery::new(tx_id()).map_response(&bytes, &context).unwrap_err();
        assert!(matches!(err, SdkError::ReceiptStatus { status: Status::InsufficientPayerBalance, .. }));

        let receipt = TransactionReceiptQuery::new(tx_id())
            .with_validate_status(false)
            .map_response(&bytes, &context)
            .unwrap();
        assert_eq!(receipt.status, Status::InsufficientPayerBalance);
        assert_eq!(receipt.transaction_id, Some(tx_id()));
    }

    #[test]
    fn test_decode_header_requires_header() {
        let bytes = proto::Response {
            response: Some(proto::response::Response::TransactionGetReceipt(Default::default())),
        }
        .encode_to_vec();
        let err = TransactionReceiptQuery::new(tx_id()).decode_header(&bytes).unwrap_err();
        assert!(matches!(err, SdkError::Decode { .. }));
    }

    #[test]
    fn test_any_query_from_bytes() {
        let query = TransactionRecordQuery::new(tx_id()).with_include_children(true);
        let decoded = AnyQuery::from_bytes(&query.to_bytes()).unwrap();
        assert_eq!(decoded, AnyQuery::TransactionRecord(query));
        assert_eq!(decoded.method(), RECORD_METHOD);
    }

    #[test]
    fn test_any_query_rejects_unknown_variant() {
        // Field 99 is no query this client knows; prost skips it and leaves the oneof empty.
        let err = AnyQuery::from_bytes(&[0x9a, 0x06, 0x00]).unwrap_err();
        assert!(matches!(err, SdkError::Decode { .. }));

        let err = AnyQuery::from_bytes(&[0xff, 0xff]).unwrap_err();
        assert!(matches!(err, SdkError::Decode { .. }));
    }

    #[test]
    fn test_freeze_ignores_node_and_is_stable() {
        let mut query = TransactionReceiptQuery::new(tx_id());
        let a = query.freeze(None, &AccountId::new(0, 0, 3)).unwrap();
        let b = query.freeze(None, &AccountId::new(0, 0, 4)).unwrap();
        assert_eq!(a, b);
        assert_eq!(query.encode(&a, &[]).unwrap(), a);
    }
}
