//! Request execution engine for Hiero network clients.
//!
//! Every request a client sends to the ledger goes through the same loop: pick a node, build
//! the request for that node, sign it, send it, classify the answer, then either return it,
//! retry against the same node after a delay, or rotate to another node. This crate implements
//! that loop once, generic over the [`Requestable`] capability, and ships the two request
//! families built on it: [`Transaction`] and the receipt/record queries.
//!
//! # Features
//!
//! - **Response classification**: precheck statuses map to success, same-node retry,
//!   different-node retry, or fatal ([`classifier`])
//! - **Node health**: a shared registry backs failed nodes off exponentially and never drops
//!   them ([`node`])
//! - **Bounded retries**: an attempt budget and a wall-clock deadline, whichever ends first
//! - **Stable transaction ids**: one id across every attempt, so the ledger deduplicates
//! - **Receipt polling**: lookups keep asking until the receipt is final
//! - **Pluggable transport and signing**: [`connection::ChannelProvider`] and
//!   [`signer::Signer`] are traits; [`mock`] provides scripted in-process versions
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use hiero_sdk::{Client, ClientConfig, Transaction, signer::KeyRef};
//! use hiero_types::AccountId;
//!
//! async fn transfer(channels: Arc<dyn ChannelProvider>, signer: Arc<dyn Signer>) -> hiero_sdk::Result<()> {
//!     let config = ClientConfig::builder()
//!         .with_node(AccountId::new(0, 0, 3), "34.94.106.61:50211")
//!         .with_operator(AccountId::new(0, 0, 1001), KeyRef::ed25519(public_key))
//!         .build()?;
//!     let client = Client::builder().config(config).channels(channels).signer(signer).build();
//!
//!     let response = Transaction::new(my_transfer).execute(&client).await?;
//!     let receipt = response.get_receipt(&client).await?;
//!     println!("{}", receipt.status);
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │        Transaction<D> │ ReceiptQuery │ RecordQuery          │
//! │              (implement Requestable)                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    Client (execution loop)                  │
//! │  deadline │ attempt budget │ classify │ rotate │ cancel     │
//! ├──────────────────────────────┬──────────────────────────────┤
//! │  NodeSelector / HealthRegistry │  Backoff (backon)          │
//! ├──────────────────────────────┴──────────────────────────────┤
//! │           ChannelProvider │ Signer │ SdkMetrics             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod classifier;
mod client;
mod config;
pub mod connection;
mod error;
pub mod metrics;
pub mod mock;
pub mod node;
pub mod query;
mod receipt;
pub mod request;
mod retry;
pub mod signer;
mod transaction;

// Public API exports
pub use client::Client;
pub use config::{
    ClientConfig, ClientConfigBuilder, NodeHealthConfig, Operator, RetryPolicy, RetryPolicyBuilder,
};
pub use error::{ErrorReport, Result, SdkError};
pub use query::{
    AnyQuery, AnyQueryResponse, TransactionIdExt, TransactionReceiptQuery, TransactionRecordQuery,
};
pub use receipt::{TransactionReceipt, TransactionRecord, Transfer};
pub use request::Requestable;
pub use retry::Backoff;
pub use transaction::{
    DEFAULT_MAX_TRANSACTION_FEE, DEFAULT_VALID_DURATION, Transaction, TransactionData,
    TransactionResponse,
};

// Re-export commonly used types from hiero-types
pub use hiero_types::{AccountId, LedgerId, Status, TransactionId};
