//! Scripted in-process network for testing code that executes requests.
//!
//! [`MockNetwork`] implements [`ChannelProvider`] without sockets. Each node answers from a
//! per-node script of [`MockReply`] values and falls back to a default reply once the script
//! is exhausted. Every dispatch is recorded with its node, method, time and the transaction id
//! it carried, so tests can assert on the exact attempt sequence.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use hiero_sdk::{
//!     Client, ClientConfig, Transaction,
//!     connection::ChannelProvider,
//!     mock::{MockNetwork, MockReply, MockSigner, MockTransfer},
//!     signer::{KeyRef, Signer},
//! };
//! use hiero_types::{AccountId, Status};
//!
//! # async fn run() -> hiero_sdk::Result<()> {
//! let key = KeyRef::ed25519(vec![1; 32]);
//! let network = Arc::new(MockNetwork::new());
//! network.script(AccountId::new(0, 0, 3), [MockReply::Precheck(Status::Busy)]);
//!
//! let config = ClientConfig::builder()
//!     .with_node(AccountId::new(0, 0, 3), "mock")
//!     .with_operator(AccountId::new(0, 0, 1001), key.clone())
//!     .build()?;
//! let client = Client::builder()
//!     .config(config)
//!     .channels(Arc::clone(&network) as Arc<dyn ChannelProvider>)
//!     .signer(Arc::new(MockSigner::new([key])) as Arc<dyn Signer>)
//!     .build();
//!
//! let mut transfer =
//!     Transaction::new(MockTransfer::new(AccountId::new(0, 0, 1001), AccountId::new(0, 0, 98), 1));
//! let response = transfer.execute(&client).await?;
//! let receipt = response.get_receipt(&client).await?;
//! assert_eq!(receipt.status, Status::Success);
//! assert_eq!(network.dispatches().len(), 3);
//! # Ok(())
//! # }
//! ```

use std::{
    collections::{HashMap, HashSet, VecDeque},
    sync::Arc,
    time::Duration,
};

use bytes::Bytes;
use futures::future::BoxFuture;
use hiero_proto::proto;
use hiero_types::{AccountId, ChecksumError, LedgerId, Status, TransactionId};
use parking_lot::Mutex;
use prost::Message;
use sha2::{Digest, Sha384};
use tokio::time::Instant;

use crate::{
    connection::{Channel, ChannelProvider, TransportError},
    query::{RECEIPT_METHOD, RECORD_METHOD},
    signer::{KeyRef, Signer, SignerError},
    transaction::TransactionData,
};

/// One scripted answer from a mock node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Precheck `OK`; lookups find a `SUCCESS` receipt.
    Success,
    /// The node answers with this precheck status. Lookups that pass precheck find a
    /// `SUCCESS` receipt.
    Precheck(Status),
    /// Precheck `OK`; lookups find a receipt with this status.
    Receipt(Status),
    /// These exact response bytes.
    Raw(Bytes),
    /// The dispatch fails at the transport level.
    Unreachable,
    /// The inner reply, after a delay.
    Delayed(Duration, Box<MockReply>),
}

/// A recorded dispatch.
#[derive(Debug, Clone)]
pub struct Dispatch {
    /// Node the request went to.
    pub node: AccountId,
    /// gRPC method path.
    pub method: &'static str,
    /// When the dispatch started, on the tokio clock.
    pub at: Instant,
    /// Transaction id carried by the request: the submitted transaction's id, or the id a
    /// lookup asks about.
    pub transaction_id: Option<TransactionId>,
    /// Dispatched bytes.
    pub request: Bytes,
}

#[derive(Debug)]
struct State {
    scripts: HashMap<AccountId, VecDeque<MockReply>>,
    default_reply: MockReply,
    dispatches: Vec<Dispatch>,
}

/// A scripted network of mock nodes.
#[derive(Debug, Clone)]
pub struct MockNetwork {
    state: Arc<Mutex<State>>,
}

impl Default for MockNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNetwork {
    /// Creates a network where every node answers [`MockReply::Success`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_default(MockReply::Success)
    }

    /// Creates a network whose nodes answer `reply` when their script is empty.
    #[must_use]
    pub fn with_default(reply: MockReply) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                scripts: HashMap::new(),
                default_reply: reply,
                dispatches: Vec::new(),
            })),
        }
    }

    /// Appends replies to `node`'s script.
    pub fn script(&self, node: AccountId, replies: impl IntoIterator<Item = MockReply>) {
        self.state.lock().scripts.entry(node).or_default().extend(replies);
    }

    /// Returns every dispatch so far, oldest first.
    #[must_use]
    pub fn dispatches(&self) -> Vec<Dispatch> {
        self.state.lock().dispatches.clone()
    }

    /// Returns the nodes dispatched to, oldest first.
    #[must_use]
    pub fn nodes_dispatched(&self) -> Vec<AccountId> {
        self.state.lock().dispatches.iter().map(|d| d.node).collect()
    }

    /// Clears scripts and recorded dispatches.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.scripts.clear();
        state.dispatches.clear();
    }

    fn next_reply(&self, node: AccountId, method: &'static str, request: &Bytes) -> MockReply {
        let mut state = self.state.lock();
        state.dispatches.push(Dispatch {
            node,
            method,
            at: Instant::now(),
            transaction_id: request_transaction_id(method, request),
            request: request.clone(),
        });
        let scripted = state.scripts.get_mut(&node).and_then(VecDeque::pop_front);
        scripted.unwrap_or_else(|| state.default_reply.clone())
    }
}

impl ChannelProvider for MockNetwork {
    fn channel(&self, node: &AccountId) -> Result<Arc<dyn Channel>, TransportError> {
        Ok(Arc::new(MockChannel { node: *node, network: self.clone() }))
    }
}

#[derive(Debug)]
struct MockChannel {
    node: AccountId,
    network: MockNetwork,
}

impl Channel for MockChannel {
    fn dispatch(&self, method: &'static str, request: Bytes) -> BoxFuture<'_, Result<Bytes, TransportError>> {
        let mut reply = self.network.next_reply(self.node, method, &request);
        Box::pin(async move {
            loop {
                match reply {
                    MockReply::Delayed(delay, inner) => {
                        tokio::time::sleep(delay).await;
                        reply = *inner;
                    },
                    MockReply::Unreachable => {
                        return Err(TransportError::Dispatch { message: "node unreachable".to_owned() });
                    },
                    MockReply::Raw(bytes) => return Ok(bytes),
                    other => return Ok(render_reply(&other, method, &request)),
                }
            }
        })
    }
}

fn request_transaction_id(method: &str, request: &[u8]) -> Option<TransactionId> {
    let id = if method == RECEIPT_METHOD || method == RECORD_METHOD {
        match proto::Query::decode(request).ok()?.query? {
            proto::query::Query::TransactionGetReceipt(q) => q.transaction_id,
            proto::query::Query::TransactionGetRecord(q) => q.transaction_id,
        }
    } else {
        let transaction = proto::Transaction::decode(request).ok()?;
        let signed = proto::SignedTransaction::decode(transaction.signed_transaction_bytes.as_slice()).ok()?;
        proto::TransactionBody::decode(signed.body_bytes.as_slice()).ok()?.transaction_id
    };
    id?.try_into().ok()
}

fn render_reply(reply: &MockReply, method: &str, request: &[u8]) -> Bytes {
    let (precheck, receipt_status) = match reply {
        MockReply::Precheck(status) => (*status, Status::Success),
        MockReply::Receipt(status) => (Status::Ok, *status),
        _ => (Status::Ok, Status::Success),
    };

    let header = Some(proto::ResponseHeader {
        node_transaction_precheck_code: precheck.code(),
        ..Default::default()
    });
    let receipt = proto::TransactionReceipt { status: receipt_status.code(), ..Default::default() };

    let bytes = if method == RECEIPT_METHOD {
        proto::Response {
            response: Some(proto::response::Response::TransactionGetReceipt(
                proto::TransactionGetReceiptResponse { header, receipt: Some(receipt), ..Default::default() },
            )),
        }
        .encode_to_vec()
    } else if method == RECORD_METHOD {
        let record = proto::TransactionRecord {
            receipt: Some(receipt),
            transaction_hash: Sha384::digest(request).to_vec(),
            transaction_id: request_transaction_id(method, request).map(Into::into),
            ..Default::default()
        };
        proto::Response {
            response: Some(proto::response::Response::TransactionGetRecord(
                proto::TransactionGetRecordResponse {
                    header,
                    transaction_record: Some(record),
                    ..Default::default()
                },
            )),
        }
        .encode_to_vec()
    } else {
        proto::TransactionResponse { node_transaction_precheck_code: precheck.code(), cost: 0 }.encode_to_vec()
    };
    Bytes::from(bytes)
}

/// A signer holding a fixed set of keys.
///
/// Signatures are `SHA-384(public_key || message)`: deterministic, and checkable with
/// [`MockSigner::expected_signature`].
#[derive(Debug, Clone, Default)]
pub struct MockSigner {
    keys: HashSet<KeyRef>,
    failure: Option<String>,
}

impl MockSigner {
    /// Creates a signer holding `keys`.
    #[must_use]
    pub fn new(keys: impl IntoIterator<Item = KeyRef>) -> Self {
        Self { keys: keys.into_iter().collect(), failure: None }
    }

    /// Makes every signing call fail with `message`.
    #[must_use]
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Returns the signature this signer produces for `message` under `key`.
    #[must_use]
    pub fn expected_signature(message: &[u8], key: &KeyRef) -> Vec<u8> {
        let mut hasher = Sha384::new();
        hasher.update(key.public_key());
        hasher.update(message);
        hasher.finalize().to_vec()
    }
}

impl Signer for MockSigner {
    fn has_key(&self, key: &KeyRef) -> bool {
        self.keys.contains(key)
    }

    fn sign(&self, message: &[u8], key: &KeyRef) -> Result<Vec<u8>, SignerError> {
        if let Some(message) = &self.failure {
            return Err(SignerError { message: message.clone() });
        }
        if !self.has_key(key) {
            return Err(SignerError { message: format!("key {key} not held") });
        }
        Ok(Self::expected_signature(message, key))
    }
}

/// An hbar transfer between two accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockTransfer {
    from: AccountId,
    to: AccountId,
    amount: i64,
    signers: Vec<KeyRef>,
}

impl MockTransfer {
    /// Moves `amount` tinybars from `from` to `to`.
    #[must_use]
    pub fn new(from: AccountId, to: AccountId, amount: i64) -> Self {
        Self { from, to, amount, signers: Vec::new() }
    }

    /// Requires `key` to sign, as a sender's key would.
    #[must_use]
    pub fn with_required_signer(mut self, key: KeyRef) -> Self {
        self.signers.push(key);
        self
    }
}

impl TransactionData for MockTransfer {
    fn operation(&self) -> &'static str {
        "TransferTransaction"
    }

    fn method(&self) -> &'static str {
        "/proto.CryptoService/cryptoTransfer"
    }

    fn encode_body(&self, buf: &mut Vec<u8>) {
        let amount = |account: AccountId, amount: i64| proto::AccountAmount {
            account_id: Some(account.into()),
            amount,
            is_approval: false,
        };
        let body = proto::CryptoTransferTransactionBody {
            transfers: Some(proto::TransferList {
                account_amounts: vec![amount(self.from, -self.amount), amount(self.to, self.amount)],
            }),
        };
        prost::encoding::message::encode(proto::TRANSACTION_BODY_CRYPTO_TRANSFER_TAG, &body, buf);
    }

    fn required_signers(&self) -> Vec<KeyRef> {
        self.signers.clone()
    }

    fn validate_checksums(&self, ledger: &LedgerId) -> Result<(), ChecksumError> {
        self.from.validate_checksum(ledger)?;
        self.to.validate_checksum(ledger)
    }
}
