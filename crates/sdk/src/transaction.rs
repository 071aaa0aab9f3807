//! The shared frame for state-changing requests.
//!
//! [`Transaction<D>`] carries everything common to every transaction: target nodes,
//! transaction id, fee ceiling, valid duration, memo and extra signers. `D` supplies the
//! operation-specific body field through [`TransactionData`].

use std::{collections::HashMap, fmt, time::Duration};

use bytes::Bytes;
use hiero_proto::proto;
use hiero_types::{AccountId, ChecksumError, LedgerId, TransactionId};
use prost::Message;
use sha2::{Digest, Sha384};
use snafu::ensure;

use crate::{
    Client,
    error::{DecodeSnafu, FreezeSnafu, Result},
    request::{AttemptContext, RequestKind, Requestable, ResponseHeader},
    receipt::{TransactionReceipt, TransactionRecord},
    signer::{KeyRef, SignaturePair, signature_map},
};

/// Default fee ceiling (2 hbar, in tinybars).
pub const DEFAULT_MAX_TRANSACTION_FEE: u64 = 200_000_000;

/// Default valid duration.
pub const DEFAULT_VALID_DURATION: Duration = Duration::from_secs(120);

/// Operation-specific part of a transaction.
pub trait TransactionData: Send + Sync + fmt::Debug {
    /// Operation name, e.g. `TransferTransaction`.
    fn operation(&self) -> &'static str;

    /// gRPC method path the transaction is submitted to.
    fn method(&self) -> &'static str;

    /// Appends the operation's field of `TransactionBody` to `buf`.
    fn encode_body(&self, buf: &mut Vec<u8>);

    /// Keys the operation itself requires, beyond the payer.
    fn required_signers(&self) -> Vec<KeyRef> {
        Vec::new()
    }

    /// Validates checksums of ids embedded in the operation.
    ///
    /// # Errors
    ///
    /// Returns [`ChecksumError`] on the first mismatch.
    fn validate_checksums(&self, ledger: &LedgerId) -> Result<(), ChecksumError> {
        let _ = ledger;
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Frozen {
    transaction_id: TransactionId,
    bodies: HashMap<AccountId, Bytes>,
}

/// A state-changing request.
#[derive(Debug, Clone)]
pub struct Transaction<D> {
    data: D,
    node_account_ids: Option<Vec<AccountId>>,
    transaction_id: Option<TransactionId>,
    max_transaction_fee: u64,
    valid_duration: Duration,
    memo: String,
    signers: Vec<KeyRef>,
    frozen: Option<Frozen>,
}

impl<D: TransactionData> Transaction<D> {
    /// Wraps operation data in a transaction with default settings.
    #[must_use]
    pub fn new(data: D) -> Self {
        Self {
            data,
            node_account_ids: None,
            transaction_id: None,
            max_transaction_fee: DEFAULT_MAX_TRANSACTION_FEE,
            valid_duration: DEFAULT_VALID_DURATION,
            memo: String::new(),
            signers: Vec::new(),
            frozen: None,
        }
    }

    /// Returns the operation data.
    #[must_use]
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Restricts submission to these nodes.
    #[must_use]
    pub fn with_node_account_ids(mut self, nodes: impl IntoIterator<Item = AccountId>) -> Self {
        self.node_account_ids = Some(nodes.into_iter().collect());
        self.frozen = None;
        self
    }

    /// Sets the transaction id instead of generating one for the operator.
    #[must_use]
    pub fn with_transaction_id(mut self, transaction_id: TransactionId) -> Self {
        self.transaction_id = Some(transaction_id);
        self.frozen = None;
        self
    }

    /// Sets the fee ceiling in tinybars.
    #[must_use]
    pub fn with_max_transaction_fee(mut self, fee: u64) -> Self {
        self.max_transaction_fee = fee;
        self.frozen = None;
        self
    }

    /// Sets how long after its valid start the transaction may be submitted.
    #[must_use]
    pub fn with_valid_duration(mut self, duration: Duration) -> Self {
        self.valid_duration = duration;
        self.frozen = None;
        self
    }

    /// Sets the memo.
    #[must_use]
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self.frozen = None;
        self
    }

    /// Adds a key that must sign in addition to the payer.
    #[must_use]
    pub fn with_signer(mut self, key: KeyRef) -> Self {
        self.signers.push(key);
        self
    }

    /// Returns the fee ceiling.
    #[must_use]
    pub fn max_transaction_fee(&self) -> u64 {
        self.max_transaction_fee
    }

    /// Returns the valid duration.
    #[must_use]
    pub fn valid_duration(&self) -> Duration {
        self.valid_duration
    }

    /// Returns the memo.
    #[must_use]
    pub fn memo(&self) -> &str {
        &self.memo
    }

    /// Returns true once a body has been built for some node.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }

    /// Submits the transaction.
    ///
    /// # Errors
    ///
    /// See [`Client::execute_with_token`].
    pub async fn execute(&mut self, client: &Client) -> Result<TransactionResponse> {
        client.execute(self).await
    }

    fn build_body(&self, transaction_id: &TransactionId, node: &AccountId) -> Bytes {
        let body = proto::TransactionBody {
            transaction_id: Some((*transaction_id).into()),
            node_account_id: Some((*node).into()),
            transaction_fee: self.max_transaction_fee,
            transaction_valid_duration: Some(self.valid_duration.into()),
            memo: self.memo.clone(),
        };
        let mut buf = body.encode_to_vec();
        self.data.encode_body(&mut buf);
        Bytes::from(buf)
    }
}

impl<D: TransactionData> Requestable for Transaction<D> {
    type Output = TransactionResponse;

    fn operation(&self) -> &'static str {
        self.data.operation()
    }

    fn method(&self) -> &'static str {
        self.data.method()
    }

    fn kind(&self) -> RequestKind {
        RequestKind::Transaction
    }

    fn transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id.or_else(|| self.frozen.as_ref().map(|f| f.transaction_id))
    }

    fn node_account_ids(&self) -> Option<&[AccountId]> {
        self.node_account_ids.as_deref()
    }

    fn required_signers(&self, operator: Option<&KeyRef>) -> Vec<KeyRef> {
        let mut keys: Vec<KeyRef> = Vec::new();
        for key in operator.into_iter().chain(&self.signers).cloned().chain(self.data.required_signers())
        {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    fn freeze(&mut self, transaction_id: Option<&TransactionId>, node: &AccountId) -> Result<Bytes> {
        let Some(&transaction_id) = transaction_id else {
            return FreezeSnafu { message: "a transaction id is required" }.fail();
        };

        if let Some(frozen) = &self.frozen {
            ensure!(
                frozen.transaction_id == transaction_id,
                FreezeSnafu {
                    message: format!(
                        "already frozen with transaction id {}, refusing {}",
                        frozen.transaction_id, transaction_id
                    )
                }
            );
            if let Some(body) = frozen.bodies.get(node) {
                return Ok(body.clone());
            }
        }

        let body = self.build_body(&transaction_id, node);
        self.frozen
            .get_or_insert_with(|| Frozen { transaction_id, bodies: HashMap::new() })
            .bodies
            .insert(*node, body.clone());
        Ok(body)
    }

    fn encode(&self, body: &Bytes, signatures: &[SignaturePair]) -> Result<Bytes> {
        let signed = proto::SignedTransaction {
            body_bytes: body.to_vec(),
            sig_map: Some(signature_map(signatures)),
        };
        let transaction = proto::Transaction { signed_transaction_bytes: signed.encode_to_vec() };
        Ok(Bytes::from(transaction.encode_to_vec()))
    }

    fn decode_header(&self, response: &[u8]) -> Result<ResponseHeader> {
        let response = proto::TransactionResponse::decode(response)
            .map_err(|err| DecodeSnafu { message: format!("TransactionResponse: {err}") }.build())?;
        Ok(ResponseHeader { status: response.status(), cost: response.cost })
    }

    fn map_response(&self, _response: &[u8], context: &AttemptContext<'_>) -> Result<TransactionResponse> {
        let transaction_id = context
            .transaction_id
            .copied()
            .ok_or_else(|| DecodeSnafu { message: "response without a transaction id" }.build())?;
        let submitted = proto::Transaction::decode(&context.request[..])
            .map_err(|err| DecodeSnafu { message: format!("submitted Transaction: {err}") }.build())?;

        Ok(TransactionResponse {
            transaction_id,
            node_id: context.node,
            transaction_hash: Sha384::digest(&submitted.signed_transaction_bytes).to_vec(),
        })
    }

    fn validate_checksums(&self, ledger: &LedgerId) -> Result<(), ChecksumError> {
        if let Some(id) = &self.transaction_id {
            id.account_id.validate_checksum(ledger)?;
        }
        for node in self.node_account_ids.iter().flatten() {
            node.validate_checksum(ledger)?;
        }
        self.data.validate_checksums(ledger)
    }
}

/// A node accepted a transaction into its pending queue.
///
/// Acceptance is not the outcome: fetch the receipt for that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResponse {
    /// Id of the submitted transaction.
    pub transaction_id: TransactionId,
    /// Node that accepted it.
    pub node_id: AccountId,
    /// SHA-384 of the submitted signed transaction bytes.
    pub transaction_hash: Vec<u8>,
}

impl TransactionResponse {
    /// Polls the accepting node for the receipt until it is final.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::ReceiptStatus`](crate::SdkError::ReceiptStatus) if the transaction
    /// failed, or any execution error of the receipt query.
    pub async fn get_receipt(&self, client: &Client) -> Result<TransactionReceipt> {
        let mut query = client
            .config()
            .receipt_factory
            .receipt_query(self.transaction_id)
            .with_node_account_ids([self.node_id]);
        client.execute(&mut query).await
    }

    /// Waits for the receipt, then fetches the record from the accepting node.
    ///
    /// # Errors
    ///
    /// As [`get_receipt`](Self::get_receipt), plus any execution error of the record query.
    pub async fn get_record(&self, client: &Client) -> Result<TransactionRecord> {
        self.get_receipt(client).await?;
        let mut query = client
            .config()
            .record_factory
            .record_query(self.transaction_id)
            .with_node_account_ids([self.node_id]);
        client.execute(&mut query).await
    }
}
