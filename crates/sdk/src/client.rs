//! Main `Client` implementation and the execution engine.
//!
//! [`Client::execute`] drives one [`Requestable`] through
//! `freeze → sign → dispatch → classify` until it succeeds, fails fatally, or runs out of
//! attempts or time:
//!
//! - Transport failures and `RetryableDifferentNode` statuses mark the node as failed in the
//!   health registry and rotate to the next candidate without sleeping.
//! - `RetryableSameNode` statuses back off exponentially and retry the same node.
//! - `Fatal` statuses surface as [`SdkError::PrecheckStatus`] after a single dispatch.
//!
//! The transaction id is resolved once, before the first attempt, and every retry reuses it,
//! so the network can deduplicate resubmissions.

use std::{fmt, sync::Arc, time::Duration};

use bytes::Bytes;
use hiero_types::{AccountId, Clock, Status, SystemClock, TransactionId};
use snafu::ensure;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{
    classifier::Outcome,
    config::ClientConfig,
    connection::{ChannelProvider, TransportError},
    error::{ConfigSnafu, MissingSignatureSnafu, Result, SdkError},
    node::{NodeHealthRegistry, NodeSelector},
    request::{AttemptContext, RequestKind, Requestable},
    retry::Backoff,
    signer::{KeyRef, SignaturePair, Signer},
};

/// Upper bound for deadlines that would overflow the clock.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

struct ClientInner {
    config: ClientConfig,
    channels: Arc<dyn ChannelProvider>,
    signer: Option<Arc<dyn Signer>>,
    clock: Arc<dyn Clock>,
    health: NodeHealthRegistry,
    cancellation: CancellationToken,
}

impl fmt::Debug for ClientInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientInner")
            .field("config", &self.config)
            .field("channels", &self.channels)
            .field("signer", &self.signer)
            .field("health", &self.health)
            .finish_non_exhaustive()
    }
}

/// Client for a Hiero network.
///
/// Cloning is cheap; clones share configuration, channels and node health.
///
/// # Example
///
/// ```no_run
/// # use std::sync::Arc;
/// # use hiero_sdk::{Client, ClientConfig, mock::MockNetwork};
/// # use hiero_types::AccountId;
/// # fn example() -> hiero_sdk::Result<()> {
/// let config = ClientConfig::builder()
///     .with_node(AccountId::new(0, 0, 3), "node3:50211")
///     .build()?;
/// let client = Client::builder()
///     .config(config)
///     .channels(Arc::new(MockNetwork::new()))
///     .build();
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

fn default_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}

#[bon::bon]
impl Client {
    /// Creates a client.
    ///
    /// Without a signer, only requests that need no signatures can be executed.
    #[builder]
    pub fn new(
        config: ClientConfig,
        channels: Arc<dyn ChannelProvider>,
        signer: Option<Arc<dyn Signer>>,
        #[builder(default = default_clock())] clock: Arc<dyn Clock>,
    ) -> Self {
        let health = config.health_registry.clone();

        Self {
            inner: Arc::new(ClientInner {
                config,
                channels,
                signer,
                clock,
                health,
                cancellation: CancellationToken::new(),
            }),
        }
    }
}

/// Either the client shutting down or the caller's token.
struct Cancellation<'a> {
    shutdown: &'a CancellationToken,
    caller: Option<&'a CancellationToken>,
}

impl Cancellation<'_> {
    fn is_cancelled(&self) -> bool {
        self.shutdown.is_cancelled() || self.caller.is_some_and(CancellationToken::is_cancelled)
    }

    async fn cancelled(&self) {
        match self.caller {
            Some(caller) => {
                tokio::select! {
                    () = self.shutdown.cancelled() => {}
                    () = caller.cancelled() => {}
                }
            },
            None => self.shutdown.cancelled().await,
        }
    }
}

enum Dispatched {
    Response(Bytes),
    Transport(TransportError),
    DeadlineElapsed,
    Cancelled,
}

/// Diagnostics carried from attempt to attempt.
#[derive(Debug, Default)]
struct LastSeen {
    node: Option<AccountId>,
    status: Option<Status>,
    error: Option<String>,
}

impl Client {
    /// Returns the client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Returns the node health registry this client reports to.
    #[must_use]
    pub fn health(&self) -> &NodeHealthRegistry {
        &self.inner.health
    }

    /// Cancels every in-progress and future execution on this client and its clones.
    pub fn shutdown(&self) {
        self.inner.cancellation.cancel();
    }

    /// Returns true once [`shutdown`](Self::shutdown) has been called.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        self.inner.cancellation.is_cancelled()
    }

    /// Executes a request with the configured default deadline.
    ///
    /// # Errors
    ///
    /// See [`execute_with_token`](Self::execute_with_token).
    pub async fn execute<R: Requestable>(&self, request: &mut R) -> Result<R::Output> {
        let timeout = self.inner.config.request_timeout;
        self.run(request, timeout, None).await
    }

    /// Executes a request with an explicit overall deadline.
    ///
    /// # Errors
    ///
    /// See [`execute_with_token`](Self::execute_with_token).
    pub async fn execute_with_timeout<R: Requestable>(
        &self,
        request: &mut R,
        timeout: Duration,
    ) -> Result<R::Output> {
        self.run(request, timeout, None).await
    }

    /// Executes a request that the caller can cancel.
    ///
    /// Cancellation stops waiting immediately. An already dispatched call is left to finish
    /// in the background and its response is discarded.
    ///
    /// # Errors
    ///
    /// - [`SdkError::Checksum`] if checksum validation is enabled and an id does not match.
    /// - [`SdkError::MissingSignature`] if a required signer is unavailable.
    /// - [`SdkError::PrecheckStatus`] if a node rejects the request.
    /// - [`SdkError::MaxAttemptsExceeded`] or [`SdkError::Timeout`] if retries run out.
    /// - [`SdkError::Cancelled`] if `token` or the client is cancelled.
    /// - Whatever the request's response mapping reports, e.g. [`SdkError::ReceiptStatus`].
    pub async fn execute_with_token<R: Requestable>(
        &self,
        request: &mut R,
        timeout: Option<Duration>,
        token: &CancellationToken,
    ) -> Result<R::Output> {
        let timeout = timeout.unwrap_or(self.inner.config.request_timeout);
        self.run(request, timeout, Some(token)).await
    }

    async fn run<R: Requestable>(
        &self,
        request: &mut R,
        timeout: Duration,
        token: Option<&CancellationToken>,
    ) -> Result<R::Output> {
        let started = Instant::now();
        let deadline = started.checked_add(timeout).unwrap_or_else(|| started + FAR_FUTURE);
        let cancel = Cancellation { shutdown: &self.inner.cancellation, caller: token };
        let operation = request.operation();

        let result = self.drive(request, started, deadline, &cancel).await;

        self.inner.config.metrics.record_request(operation, started.elapsed(), result.is_ok());
        if let Err(err) = &result {
            tracing::debug!(operation, error = %err, "execution failed");
        }
        result
    }

    async fn drive<R: Requestable>(
        &self,
        request: &mut R,
        started: Instant,
        deadline: Instant,
        cancel: &Cancellation<'_>,
    ) -> Result<R::Output> {
        if cancel.is_cancelled() {
            return Err(SdkError::Cancelled);
        }

        let config = &self.inner.config;
        let operation = request.operation();

        if config.auto_validate_checksums
            && let Some(ledger) = &config.ledger_id
        {
            request.validate_checksums(ledger)?;
        }

        let transaction_id = self.resolve_transaction_id(request)?;

        let candidates = request
            .node_account_ids()
            .map_or_else(|| config.node_account_ids(), <[AccountId]>::to_vec);
        let mut selector = NodeSelector::new(candidates, self.inner.health.clone())
            .ok_or_else(|| ConfigSnafu { message: "no nodes to submit to" }.build())?;

        let keys = self.resolve_signers(request)?;

        let policy = &config.retry_policy;
        let mut backoff = Backoff::new(policy);
        let mut last = LastSeen::default();
        let mut attempt: u32 = 0;

        loop {
            if Instant::now() >= deadline {
                return Err(self.timeout_error(operation, started, attempt, last, transaction_id));
            }

            attempt += 1;
            let node = selector.current();
            last.node = Some(node);

            let body = request.freeze(transaction_id.as_ref(), &node)?;
            let signatures = self.sign(&body, &keys)?;
            let bytes = request.encode(&body, &signatures)?;

            tracing::debug!(
                operation,
                node = %node,
                attempt,
                transaction_id = ?transaction_id,
                "dispatching request"
            );
            tracing::trace!(request_bytes = bytes.len(), "request encoded");

            let response = match self.dispatch(request.method(), node, bytes.clone(), deadline, cancel).await
            {
                Dispatched::Response(response) => response,
                Dispatched::Transport(err) => {
                    tracing::debug!(operation, node = %node, attempt, error = %err, "dispatch failed");
                    last.status = None;
                    last.error = Some(
                        SdkError::Connectivity { node, source: err }.to_string(),
                    );
                    self.mark_failed(&node);
                    self.check_attempts(operation, attempt, &last, transaction_id)?;
                    config.metrics.record_retry(operation, attempt + 1, "connectivity");
                    selector.advance();
                    backoff.reset();
                    continue;
                },
                Dispatched::DeadlineElapsed => {
                    return Err(self.timeout_error(operation, started, attempt, last, transaction_id));
                },
                Dispatched::Cancelled => return Err(SdkError::Cancelled),
            };

            tracing::trace!(response_bytes = response.len(), "response received");

            let header = request.decode_header(&response)?;
            last.status = Some(header.status);
            last.error = None;

            match request.classify(&header, &response) {
                Outcome::Success => {
                    if self.inner.health.record_success(&node) {
                        config.metrics.record_node_health(&node.to_string(), true);
                    }
                    let context = AttemptContext {
                        node,
                        transaction_id: transaction_id.as_ref(),
                        attempt,
                        request: &bytes,
                    };
                    return request.map_response(&response, &context);
                },
                Outcome::RetryableSameNode => {
                    self.check_attempts(operation, attempt, &last, transaction_id)?;
                    let delay = backoff.next_delay();
                    config.metrics.record_retry(operation, attempt + 1, &header.status.to_string());
                    tracing::debug!(
                        operation,
                        node = %node,
                        attempt,
                        status = %header.status,
                        backoff_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "retrying same node after backoff"
                    );

                    let wake = Instant::now().checked_add(delay).map_or(deadline, |t| t.min(deadline));
                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => return Err(SdkError::Cancelled),
                        () = tokio::time::sleep_until(wake) => {}
                    }
                },
                Outcome::RetryableDifferentNode => {
                    self.mark_failed(&node);
                    self.check_attempts(operation, attempt, &last, transaction_id)?;
                    config.metrics.record_retry(operation, attempt + 1, &header.status.to_string());
                    let next = selector.advance();
                    backoff.reset();
                    tracing::debug!(
                        operation,
                        node = %node,
                        next_node = %next,
                        attempt,
                        status = %header.status,
                        "rotating to another node"
                    );
                },
                Outcome::Fatal => {
                    return Err(SdkError::PrecheckStatus {
                        status: header.status,
                        transaction_id,
                        node,
                    });
                },
            }
        }
    }

    fn resolve_transaction_id<R: Requestable>(&self, request: &R) -> Result<Option<TransactionId>> {
        if let Some(id) = request.transaction_id() {
            return Ok(Some(id));
        }
        if request.kind() == RequestKind::Query {
            return Ok(None);
        }

        let operator = self.inner.config.operator.as_ref().ok_or_else(|| {
            ConfigSnafu { message: "transaction has no transaction id and no operator is configured" }
                .build()
        })?;
        let id = TransactionId::generate_with(
            operator.account_id,
            self.inner.clock.as_ref(),
            &mut rand::rng(),
        );
        Ok(Some(id))
    }

    fn resolve_signers<R: Requestable>(&self, request: &R) -> Result<Vec<KeyRef>> {
        let operation = request.operation();
        let operator_key = self.inner.config.operator.as_ref().map(|operator| &operator.key);
        let keys = request.required_signers(operator_key);

        if request.kind() == RequestKind::Transaction {
            ensure!(!keys.is_empty(), MissingSignatureSnafu { operation, key: "payer" });
        }
        if keys.is_empty() {
            return Ok(keys);
        }

        let Some(signer) = &self.inner.signer else {
            return MissingSignatureSnafu { operation, key: keys[0].to_hex() }.fail();
        };
        for key in &keys {
            ensure!(signer.has_key(key), MissingSignatureSnafu { operation, key: key.to_hex() });
        }
        Ok(keys)
    }

    fn sign(&self, body: &[u8], keys: &[KeyRef]) -> Result<Vec<SignaturePair>> {
        let Some(signer) = &self.inner.signer else {
            return Ok(Vec::new());
        };
        keys.iter()
            .map(|key| {
                let signature = signer.sign(body, key).map_err(|err| SdkError::Signing {
                    key: key.to_hex(),
                    message: err.message,
                })?;
                Ok(SignaturePair { key: key.clone(), signature })
            })
            .collect()
    }

    async fn dispatch(
        &self,
        method: &'static str,
        node: AccountId,
        request: Bytes,
        deadline: Instant,
        cancel: &Cancellation<'_>,
    ) -> Dispatched {
        let channel = match self.inner.channels.channel(&node) {
            Ok(channel) => channel,
            Err(err) => return Dispatched::Transport(err),
        };

        let attempt_timeout = self.inner.config.attempt_timeout;
        // Abandoning the wait detaches the call; it keeps running.
        let call = tokio::spawn(async move {
            match tokio::time::timeout(attempt_timeout, channel.dispatch(method, request)).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::AttemptTimeout {
                    timeout_ms: u64::try_from(attempt_timeout.as_millis()).unwrap_or(u64::MAX),
                }),
            }
        });

        tokio::select! {
            biased;
            () = cancel.cancelled() => Dispatched::Cancelled,
            () = tokio::time::sleep_until(deadline) => Dispatched::DeadlineElapsed,
            joined = call => match joined {
                Ok(Ok(response)) => Dispatched::Response(response),
                Ok(Err(err)) => Dispatched::Transport(err),
                Err(err) => Dispatched::Transport(TransportError::Dispatch { message: err.to_string() }),
            },
        }
    }

    fn mark_failed(&self, node: &AccountId) {
        if self.inner.health.record_failure(node) == 1 {
            self.inner.config.metrics.record_node_health(&node.to_string(), false);
        }
    }

    fn check_attempts(
        &self,
        operation: &'static str,
        attempt: u32,
        last: &LastSeen,
        transaction_id: Option<TransactionId>,
    ) -> Result<()> {
        if attempt < self.inner.config.retry_policy.max_attempts {
            return Ok(());
        }
        tracing::warn!(
            operation,
            attempts = attempt,
            node = ?last.node,
            status = ?last.status,
            "retry budget exhausted"
        );
        Err(SdkError::MaxAttemptsExceeded {
            operation,
            attempts: attempt,
            node: last.node,
            status: last.status,
            transaction_id,
            last_error: last.error.clone(),
        })
    }

    fn timeout_error(
        &self,
        operation: &'static str,
        started: Instant,
        attempts: u32,
        last: LastSeen,
        transaction_id: Option<TransactionId>,
    ) -> SdkError {
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::warn!(operation, elapsed_ms, attempts, node = ?last.node, "execution deadline exceeded");
        SdkError::Timeout {
            operation,
            elapsed_ms,
            attempts,
            node: last.node,
            status: last.status,
            transaction_id,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use hiero_types::{FixedClock, Timestamp};

    use super::*;
    use crate::{
        config::RetryPolicy,
        mock::{MockNetwork, MockReply, MockSigner, MockTransfer},
        transaction::Transaction,
    };

    fn node(num: u64) -> AccountId {
        AccountId::new(0, 0, num)
    }

    fn operator_key() -> KeyRef {
        KeyRef::ed25519(vec![7; 32])
    }

    fn client(network: &Arc<MockNetwork>, policy: RetryPolicy) -> Client {
        let config = ClientConfig::builder()
            .with_network([(node(3), "a"), (node(4), "b")])
            .with_operator(node(1001), operator_key())
            .with_retry_policy(policy)
            .with_health_registry(NodeHealthRegistry::default())
            .build()
            .unwrap();
        Client::builder()
            .config(config)
            .channels(Arc::clone(network) as Arc<dyn ChannelProvider>)
            .signer(Arc::new(MockSigner::new([operator_key()])) as Arc<dyn Signer>)
            .clock(Arc::new(FixedClock(Timestamp::new(1_700_000_000, 0))) as Arc<dyn Clock>)
            .build()
    }

    fn transfer() -> Transaction<MockTransfer> {
        Transaction::new(MockTransfer::new(node(1001), node(98), 10))
    }

    #[tokio::test(start_paused = true)]
    async fn test_generated_transaction_id_uses_clock_and_operator() {
        let network = Arc::new(MockNetwork::new());
        let client = client(&network, RetryPolicy::default());

        let response = client.execute(&mut transfer()).await.unwrap();
        assert_eq!(response.transaction_id.account_id, node(1001));
        let start = response.transaction_id.valid_start;
        assert!(start <= Timestamp::new(1_700_000_000, 0));
        assert!(start >= Timestamp::new(1_699_999_995, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_reuses_transaction_id() {
        let network = Arc::new(MockNetwork::new());
        network.script(node(3), [MockReply::Precheck(Status::Busy), MockReply::Precheck(Status::Ok)]);
        let client = client(&network, RetryPolicy::default());

        client.execute(&mut transfer()).await.unwrap();

        let ids: Vec<_> = network.dispatches().iter().map(|d| d.transaction_id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids[0].is_some());
        assert_eq!(ids[0], ids[1]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels() {
        let network = Arc::new(MockNetwork::new());
        let client = client(&network, RetryPolicy::default());
        client.shutdown();

        let err = client.execute(&mut transfer()).await.unwrap_err();
        assert!(matches!(err, SdkError::Cancelled));
        assert!(network.dispatches().is_empty());
        assert!(client.is_shutdown());
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_without_operator_needs_no_signer() {
        let network = Arc::new(MockNetwork::new());
        let config = ClientConfig::builder().with_node(node(3), "a").build().unwrap();
        let client = Client::builder()
            .config(config)
            .channels(Arc::clone(&network) as Arc<dyn ChannelProvider>)
            .build();

        let id = TransactionId::with_valid_start(node(1001), Timestamp::new(1_700_000_000, 0));
        let receipt = client
            .execute(&mut crate::query::TransactionReceiptQuery::new(id))
            .await
            .unwrap();
        assert_eq!(receipt.status, Status::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transaction_without_operator_or_id_is_config_error() {
        let network = Arc::new(MockNetwork::new());
        let config = ClientConfig::builder().with_node(node(3), "a").build().unwrap();
        let client = Client::builder()
            .config(config)
            .channels(Arc::clone(&network) as Arc<dyn ChannelProvider>)
            .build();

        let err = client.execute(&mut transfer()).await.unwrap_err();
        assert!(matches!(err, SdkError::Config { .. }));
        assert!(network.dispatches().is_empty());
    }
}
