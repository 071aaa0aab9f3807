//! Channels to network nodes and the pool that caches them.
//!
//! # Architecture
//!
//! - [`Channel`]: one duplex byte channel to one node. `dispatch` sends a serialized request to
//!   a gRPC method path and resolves with the serialized response.
//! - [`ChannelProvider`]: what the engine consumes; maps a node account id to a channel.
//! - [`Connector`]: opens a channel to an address. Implemented by the transport layer.
//! - [`ChannelPool`]: a [`ChannelProvider`] that connects lazily through a [`Connector`] and
//!   caches one channel per node.
//!
//! The engine clones the channel `Arc` for exactly one dispatch and releases it when the
//! dispatch resolves, so no channel is held across a backoff sleep.

use std::{collections::BTreeMap, fmt, sync::Arc};

use bytes::Bytes;
use dashmap::DashMap;
use futures::future::BoxFuture;
use hiero_types::AccountId;
use snafu::Snafu;

use crate::metrics::{ConnectionEvent, SdkMetrics, default_metrics};

/// Transport-level failure. Always retried against a different node.
#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
#[snafu(visibility(pub))]
pub enum TransportError {
    /// A connection to the node's address could not be opened.
    #[snafu(display("Connection to {address} failed: {message}"))]
    Connect {
        /// Node address.
        address: String,
        /// Failure description.
        message: String,
    },

    /// The request was sent but no response came back.
    #[snafu(display("Dispatch failed: {message}"))]
    Dispatch {
        /// Failure description.
        message: String,
    },

    /// No address is known for the node.
    #[snafu(display("No address known for node {node}"))]
    UnknownNode {
        /// Node account id.
        node: AccountId,
    },

    /// A single attempt exceeded its own timeout.
    #[snafu(display("Attempt timed out after {timeout_ms}ms"))]
    AttemptTimeout {
        /// Per-attempt timeout in milliseconds.
        timeout_ms: u64,
    },
}

/// A byte channel to one node.
pub trait Channel: Send + Sync + fmt::Debug {
    /// Sends `request` to the gRPC `method` path and resolves with the response bytes.
    fn dispatch(&self, method: &'static str, request: Bytes) -> BoxFuture<'_, Result<Bytes, TransportError>>;
}

/// Resolves node account ids to channels.
pub trait ChannelProvider: Send + Sync + fmt::Debug {
    /// Returns a channel to `node`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the node is unknown or cannot be connected.
    fn channel(&self, node: &AccountId) -> Result<Arc<dyn Channel>, TransportError>;
}

/// Opens channels to node addresses.
pub trait Connector: Send + Sync + fmt::Debug {
    /// Opens a channel to `address`.
    ///
    /// Implementations should connect lazily; the first dispatch may establish the connection.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connect`] if the address is unusable.
    fn connect(&self, address: &str) -> Result<Arc<dyn Channel>, TransportError>;
}

/// Lazily connected, per-node channel cache.
#[derive(Debug)]
pub struct ChannelPool<C> {
    connector: C,
    addresses: BTreeMap<AccountId, String>,
    channels: DashMap<AccountId, Arc<dyn Channel>>,
    metrics: Arc<dyn SdkMetrics>,
}

impl<C: Connector> ChannelPool<C> {
    /// Creates a pool over the given node address book.
    ///
    /// No connection is opened until a node's channel is first requested.
    #[must_use]
    pub fn new(connector: C, addresses: BTreeMap<AccountId, String>) -> Self {
        Self { connector, addresses, channels: DashMap::new(), metrics: default_metrics() }
    }

    /// Sets the metrics sink for connection events.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn SdkMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Returns the address known for `node`.
    #[must_use]
    pub fn address(&self, node: &AccountId) -> Option<&str> {
        self.addresses.get(node).map(String::as_str)
    }

    /// Returns the number of cached channels.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.channels.len()
    }

    /// Evicts the cached channel for `node`, forcing a reconnect on next use.
    pub fn reset(&self, node: &AccountId) {
        if self.channels.remove(node).is_some()
            && let Some(address) = self.address(node)
        {
            self.metrics.record_connection(address, ConnectionEvent::Disconnected);
        }
    }
}

impl<C: Connector> ChannelProvider for ChannelPool<C> {
    fn channel(&self, node: &AccountId) -> Result<Arc<dyn Channel>, TransportError> {
        // Fast path: channel already cached
        if let Some(channel) = self.channels.get(node) {
            return Ok(Arc::clone(channel.value()));
        }

        let address =
            self.addresses.get(node).ok_or(TransportError::UnknownNode { node: *node })?;

        let channel = match self.connector.connect(address) {
            Ok(channel) => channel,
            Err(err) => {
                self.metrics.record_connection(address, ConnectionEvent::Failed);
                tracing::debug!(node = %node, address = %address, error = %err, "connect failed");
                return Err(err);
            },
        };

        // Another task may have connected while we did; keep whichever landed first.
        let entry = self.channels.entry(*node).or_insert_with(|| {
            self.metrics.record_connection(address, ConnectionEvent::Connected);
            channel
        });
        Ok(Arc::clone(entry.value()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Debug)]
    struct EchoChannel;

    impl Channel for EchoChannel {
        fn dispatch(&self, _method: &'static str, request: Bytes) -> BoxFuture<'_, Result<Bytes, TransportError>> {
            Box::pin(async move { Ok(request) })
        }
    }

    #[derive(Debug, Default)]
    struct CountingConnector {
        connects: AtomicUsize,
    }

    impl Connector for CountingConnector {
        fn connect(&self, address: &str) -> Result<Arc<dyn Channel>, TransportError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            if address.is_empty() {
                return ConnectSnafu { address, message: "empty address" }.fail();
            }
            Ok(Arc::new(EchoChannel))
        }
    }

    fn pool() -> ChannelPool<CountingConnector> {
        let addresses = BTreeMap::from([
            (AccountId::new(0, 0, 3), "node3:50211".to_owned()),
            (AccountId::new(0, 0, 4), String::new()),
        ]);
        ChannelPool::new(CountingConnector::default(), addresses)
    }

    #[test]
    fn test_channel_connects_once_and_caches() {
        let pool = pool();
        let node = AccountId::new(0, 0, 3);

        pool.channel(&node).unwrap();
        pool.channel(&node).unwrap();

        assert_eq!(pool.connector.connects.load(Ordering::SeqCst), 1);
        assert_eq!(pool.cached(), 1);
    }

    #[test]
    fn test_reset_forces_reconnect() {
        let pool = pool();
        let node = AccountId::new(0, 0, 3);

        pool.channel(&node).unwrap();
        pool.reset(&node);
        assert_eq!(pool.cached(), 0);
        pool.channel(&node).unwrap();

        assert_eq!(pool.connector.connects.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unknown_node() {
        let err = pool().channel(&AccountId::new(0, 0, 99)).unwrap_err();
        assert_eq!(err, TransportError::UnknownNode { node: AccountId::new(0, 0, 99) });
    }

    #[test]
    fn test_connect_failure_is_not_cached() {
        let pool = pool();
        let node = AccountId::new(0, 0, 4);
        assert!(matches!(pool.channel(&node), Err(TransportError::Connect { .. })));
        assert_eq!(pool.cached(), 0);
    }

    #[tokio::test]
    async fn test_dispatch_through_pooled_channel() {
        let pool = pool();
        let channel = pool.channel(&AccountId::new(0, 0, 3)).unwrap();
        let reply = channel.dispatch("/test", Bytes::from_static(b"ping")).await.unwrap();
        assert_eq!(&reply[..], b"ping");
    }
}
