//! The capability every executable request implements.
//!
//! [`Requestable`] splits one request into the steps the engine drives: freeze against a
//! transaction id and node, encode with signatures, decode the response header, classify,
//! and map the payload. The engine is generic over this trait; transactions and queries are
//! separate implementations of it.

use bytes::Bytes;
use hiero_types::{AccountId, ChecksumError, LedgerId, Status, TransactionId};

use crate::{
    classifier::{Outcome, classify},
    error::Result,
    signer::{KeyRef, SignaturePair},
};

/// Whether a request changes ledger state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// State-changing; needs a transaction id and signatures.
    Transaction,
    /// Read-only.
    Query,
}

/// The part of a response the engine classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseHeader {
    /// Precheck status.
    pub status: Status,
    /// Cost reported by the node, in tinybars.
    pub cost: u64,
}

/// What the engine knows about the attempt that produced a response.
#[derive(Debug, Clone, Copy)]
pub struct AttemptContext<'a> {
    /// Node that answered.
    pub node: AccountId,
    /// Transaction id the request was frozen with, if any.
    pub transaction_id: Option<&'a TransactionId>,
    /// One-based attempt number.
    pub attempt: u32,
    /// Bytes that were dispatched.
    pub request: &'a Bytes,
}

/// An executable request.
pub trait Requestable: Send + Sync {
    /// Decoded result of a successful execution.
    type Output: Send + 'static;

    /// Operation name for logs, metrics and errors.
    fn operation(&self) -> &'static str;

    /// gRPC method path the request is dispatched to.
    fn method(&self) -> &'static str;

    /// Whether the request changes ledger state.
    fn kind(&self) -> RequestKind;

    /// Transaction id set on (or frozen into) the request, if any.
    fn transaction_id(&self) -> Option<TransactionId>;

    /// Explicit target nodes. `None` lets the client use its whole network.
    fn node_account_ids(&self) -> Option<&[AccountId]>;

    /// Keys that must sign, given the operator's key.
    fn required_signers(&self, operator: Option<&KeyRef>) -> Vec<KeyRef> {
        let _ = operator;
        Vec::new()
    }

    /// Builds the body bytes to sign for `node`.
    ///
    /// Must be idempotent: freezing again with the same transaction id returns the same bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Freeze`](crate::SdkError::Freeze) if the request was already frozen
    /// with a different transaction id or cannot be encoded.
    fn freeze(&mut self, transaction_id: Option<&TransactionId>, node: &AccountId) -> Result<Bytes>;

    /// Wraps the frozen body and its signatures into the dispatched message.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be encoded.
    fn encode(&self, body: &Bytes, signatures: &[SignaturePair]) -> Result<Bytes>;

    /// Extracts the response header.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Decode`](crate::SdkError::Decode) if the bytes are not a response
    /// of the expected shape.
    fn decode_header(&self, response: &[u8]) -> Result<ResponseHeader>;

    /// Classifies a response. Defaults to the status table.
    fn classify(&self, header: &ResponseHeader, response: &[u8]) -> Outcome {
        let _ = response;
        classify(header.status)
    }

    /// Decodes the payload of a successful response.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is malformed or reports a failure.
    fn map_response(&self, response: &[u8], context: &AttemptContext<'_>) -> Result<Self::Output>;

    /// Validates checksums of every id the request carries.
    ///
    /// # Errors
    ///
    /// Returns [`ChecksumError`] on the first mismatch.
    fn validate_checksums(&self, ledger: &LedgerId) -> Result<(), ChecksumError> {
        let _ = ledger;
        Ok(())
    }
}
