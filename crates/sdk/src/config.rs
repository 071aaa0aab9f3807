//! Client configuration with builder pattern.
//!
//! Provides type-safe configuration for SDK clients including:
//! - The node address book and ledger identity
//! - The operator (default payer and signing key)
//! - Per-attempt and overall execution timeouts
//! - Retry and node readmission policies

use std::{collections::BTreeMap, fmt, sync::Arc, time::Duration};

use hiero_types::{AccountId, LedgerId};
use serde::{Deserialize, Serialize};
use snafu::ensure;

use crate::{
    error::{ConfigSnafu, Result},
    metrics::{SdkMetrics, default_metrics},
    node::NodeHealthRegistry,
    query::{DefaultQueryFactory, ReceiptQueryFactory, RecordQueryFactory},
    signer::KeyRef,
};

/// Default per-attempt timeout (10 seconds).
const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default overall execution deadline (2 minutes).
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Account that pays for transactions and the key that signs for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    /// Paying account.
    pub account_id: AccountId,
    /// Public key of the paying account.
    pub key: KeyRef,
}

/// Configuration for a [`Client`](crate::Client).
#[derive(Clone)]
pub struct ClientConfig {
    /// Node account id to address.
    pub(crate) network: BTreeMap<AccountId, String>,

    /// Ledger identity used for checksum validation.
    pub(crate) ledger_id: Option<LedgerId>,

    /// Default payer and signing key.
    pub(crate) operator: Option<Operator>,

    /// Retry policy for same-node retries and the attempt budget.
    pub(crate) retry_policy: RetryPolicy,

    /// Readmission backoff for unhealthy nodes.
    pub(crate) node_health: NodeHealthConfig,

    /// Timeout for one dispatch.
    pub(crate) attempt_timeout: Duration,

    /// Default overall deadline for one `execute` call.
    pub(crate) request_timeout: Duration,

    /// Validate id checksums against `ledger_id` before dispatch.
    pub(crate) auto_validate_checksums: bool,

    pub(crate) metrics: Arc<dyn SdkMetrics>,

    /// Node health shared by clients built from this config.
    pub(crate) health_registry: NodeHealthRegistry,

    pub(crate) receipt_factory: Arc<dyn ReceiptQueryFactory>,

    pub(crate) record_factory: Arc<dyn RecordQueryFactory>,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("network", &self.network)
            .field("ledger_id", &self.ledger_id)
            .field("operator", &self.operator)
            .field("retry_policy", &self.retry_policy)
            .field("node_health", &self.node_health)
            .field("attempt_timeout", &self.attempt_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("auto_validate_checksums", &self.auto_validate_checksums)
            .finish_non_exhaustive()
    }
}

impl ClientConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Returns the node address book.
    #[must_use]
    pub fn network(&self) -> &BTreeMap<AccountId, String> {
        &self.network
    }

    /// Returns the node account ids in address-book order.
    #[must_use]
    pub fn node_account_ids(&self) -> Vec<AccountId> {
        self.network.keys().copied().collect()
    }

    /// Returns the ledger identity, if configured.
    #[must_use]
    pub fn ledger_id(&self) -> Option<&LedgerId> {
        self.ledger_id.as_ref()
    }

    /// Returns the operator, if configured.
    #[must_use]
    pub fn operator(&self) -> Option<&Operator> {
        self.operator.as_ref()
    }

    /// Returns the retry policy.
    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the node readmission policy.
    #[must_use]
    pub fn node_health(&self) -> &NodeHealthConfig {
        &self.node_health
    }

    /// Returns the per-attempt timeout.
    #[must_use]
    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    /// Returns the default overall execution deadline.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Returns whether checksums are validated before dispatch.
    #[must_use]
    pub fn auto_validate_checksums(&self) -> bool {
        self.auto_validate_checksums
    }

    /// Returns the metrics sink.
    #[must_use]
    pub fn metrics(&self) -> &Arc<dyn SdkMetrics> {
        &self.metrics
    }
}

/// Builder for [`ClientConfig`].
#[derive(Default)]
pub struct ClientConfigBuilder {
    network: BTreeMap<AccountId, String>,
    ledger_id: Option<LedgerId>,
    operator: Option<Operator>,
    retry_policy: Option<RetryPolicy>,
    node_health: Option<NodeHealthConfig>,
    attempt_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    auto_validate_checksums: bool,
    metrics: Option<Arc<dyn SdkMetrics>>,
    health_registry: Option<NodeHealthRegistry>,
    receipt_factory: Option<Arc<dyn ReceiptQueryFactory>>,
    record_factory: Option<Arc<dyn RecordQueryFactory>>,
}

impl ClientConfigBuilder {
    /// Sets the node address book, replacing any nodes added so far.
    #[must_use]
    pub fn with_network<I, S>(mut self, network: I) -> Self
    where
        I: IntoIterator<Item = (AccountId, S)>,
        S: Into<String>,
    {
        self.network = network.into_iter().map(|(node, address)| (node, address.into())).collect();
        self
    }

    /// Adds a single node.
    #[must_use]
    pub fn with_node<S: Into<String>>(mut self, node: AccountId, address: S) -> Self {
        self.network.insert(node, address.into());
        self
    }

    /// Sets the ledger identity used for checksum validation.
    #[must_use]
    pub fn with_ledger_id(mut self, ledger_id: LedgerId) -> Self {
        self.ledger_id = Some(ledger_id);
        self
    }

    /// Sets the operator account and key.
    ///
    /// Transactions without an explicit transaction id get one generated for this account,
    /// and this key is always a required signer.
    #[must_use]
    pub fn with_operator(mut self, account_id: AccountId, key: KeyRef) -> Self {
        self.operator = Some(Operator { account_id, key });
        self
    }

    /// Sets the retry policy.
    ///
    /// Default: [`RetryPolicy::default()`].
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Sets the node readmission policy.
    ///
    /// Without an injected registry, a custom policy gets a registry of its own instead of
    /// [`NodeHealthRegistry::global`].
    #[must_use]
    pub fn with_node_health(mut self, config: NodeHealthConfig) -> Self {
        self.node_health = Some(config);
        self
    }

    /// Sets the per-attempt timeout.
    ///
    /// Default: 10 seconds.
    #[must_use]
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = Some(timeout);
        self
    }

    /// Sets the default overall execution deadline.
    ///
    /// Default: 2 minutes.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Enables checksum validation of request ids before dispatch.
    ///
    /// Has no effect unless a ledger id is configured. Default: disabled.
    #[must_use]
    pub fn with_auto_validate_checksums(mut self, enabled: bool) -> Self {
        self.auto_validate_checksums = enabled;
        self
    }

    /// Sets the metrics sink.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn SdkMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Tracks node health in `registry`.
    ///
    /// Default: [`NodeHealthRegistry::global`], unless a custom node health policy is set.
    #[must_use]
    pub fn with_health_registry(mut self, registry: NodeHealthRegistry) -> Self {
        self.health_registry = Some(registry);
        self
    }

    /// Sets the factory used to build receipt queries.
    #[must_use]
    pub fn with_receipt_factory(mut self, factory: Arc<dyn ReceiptQueryFactory>) -> Self {
        self.receipt_factory = Some(factory);
        self
    }

    /// Sets the factory used to build record queries.
    #[must_use]
    pub fn with_record_factory(mut self, factory: Arc<dyn RecordQueryFactory>) -> Self {
        self.record_factory = Some(factory);
        self
    }

    /// Builds the configuration, validating all settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No nodes provided, or a node address is empty
    /// - Attempt or request timeout is zero
    /// - The retry policy is invalid (see [`RetryPolicy::validate`])
    /// - The node health policy is invalid
    pub fn build(self) -> Result<ClientConfig> {
        ensure!(!self.network.is_empty(), ConfigSnafu { message: "at least one node is required" });

        for (node, address) in &self.network {
            ensure!(
                !address.trim().is_empty(),
                ConfigSnafu { message: format!("address for node {node} cannot be empty") }
            );
        }

        let attempt_timeout = self.attempt_timeout.unwrap_or(DEFAULT_ATTEMPT_TIMEOUT);
        ensure!(!attempt_timeout.is_zero(), ConfigSnafu { message: "attempt_timeout cannot be zero" });

        let request_timeout = self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT);
        ensure!(!request_timeout.is_zero(), ConfigSnafu { message: "request_timeout cannot be zero" });

        let retry_policy = self.retry_policy.unwrap_or_default();
        retry_policy.validate()?;

        let custom_health = self.node_health.is_some();
        let node_health = self.node_health.unwrap_or_default();
        node_health.validate()?;

        let health_registry = match self.health_registry {
            Some(registry) => registry,
            None if custom_health => NodeHealthRegistry::new(node_health.clone()),
            None => NodeHealthRegistry::global().clone(),
        };

        let default_factory = Arc::new(DefaultQueryFactory);

        Ok(ClientConfig {
            network: self.network,
            ledger_id: self.ledger_id,
            operator: self.operator,
            retry_policy,
            node_health,
            attempt_timeout,
            request_timeout,
            auto_validate_checksums: self.auto_validate_checksums,
            metrics: self.metrics.unwrap_or_else(default_metrics),
            health_registry,
            receipt_factory: self.receipt_factory.unwrap_or_else(|| default_factory.clone()),
            record_factory: self.record_factory.unwrap_or(default_factory),
        })
    }
}

/// Retry policy configuration.
///
/// `initial_backoff`, `max_backoff` and `multiplier` shape the delay before a retry against
/// the same node. Rotating to another node does not sleep and restarts the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial attempt).
    pub max_attempts: u32,

    /// Delay before the first same-node retry.
    #[serde(with = "humantime_serde")]
    pub initial_backoff: Duration,

    /// Maximum same-node retry delay.
    #[serde(with = "humantime_serde")]
    pub max_backoff: Duration,

    /// Backoff multiplier for exponential increase.
    pub multiplier: f64,

    /// Jitter factor (0.0 to 1.0) for randomizing backoff.
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(8),
            multiplier: 2.0,
            jitter: 0.0,
        }
    }
}

impl RetryPolicy {
    /// Creates a new retry policy builder.
    #[must_use]
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// Creates a policy that never retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self { max_attempts: 1, ..Default::default() }
    }

    /// Validates the policy.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`](crate::SdkError::Config) if `max_attempts` is zero,
    /// `initial_backoff` exceeds `max_backoff`, `multiplier` is below 1, or `jitter` lies
    /// outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.max_attempts >= 1, ConfigSnafu { message: "max_attempts must be >= 1" });
        ensure!(
            self.initial_backoff <= self.max_backoff,
            ConfigSnafu {
                message: format!(
                    "initial_backoff ({:?}) must not exceed max_backoff ({:?})",
                    self.initial_backoff, self.max_backoff
                )
            }
        );
        ensure!(
            self.multiplier >= 1.0,
            ConfigSnafu { message: format!("multiplier must be >= 1.0, got {}", self.multiplier) }
        );
        ensure!(
            (0.0..=1.0).contains(&self.jitter),
            ConfigSnafu { message: format!("jitter must be within [0, 1], got {}", self.jitter) }
        );
        Ok(())
    }
}

/// Builder for [`RetryPolicy`].
#[derive(Debug, Default)]
pub struct RetryPolicyBuilder {
    max_attempts: Option<u32>,
    initial_backoff: Option<Duration>,
    max_backoff: Option<Duration>,
    multiplier: Option<f64>,
    jitter: Option<f64>,
}

impl RetryPolicyBuilder {
    /// Sets the maximum number of attempts.
    #[must_use]
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Sets the initial backoff duration.
    #[must_use]
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = Some(backoff);
        self
    }

    /// Sets the maximum backoff duration.
    #[must_use]
    pub fn with_max_backoff(mut self, backoff: Duration) -> Self {
        self.max_backoff = Some(backoff);
        self
    }

    /// Sets the backoff multiplier.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    /// Sets the jitter factor (0.0 to 1.0).
    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = Some(jitter);
        self
    }

    /// Builds the retry policy. Validation happens when the client config is built.
    #[must_use]
    pub fn build(self) -> RetryPolicy {
        let defaults = RetryPolicy::default();
        RetryPolicy {
            max_attempts: self.max_attempts.unwrap_or(defaults.max_attempts),
            initial_backoff: self.initial_backoff.unwrap_or(defaults.initial_backoff),
            max_backoff: self.max_backoff.unwrap_or(defaults.max_backoff),
            multiplier: self.multiplier.unwrap_or(defaults.multiplier),
            jitter: self.jitter.unwrap_or(defaults.jitter),
        }
    }
}

/// Readmission policy for nodes that failed.
///
/// A node that fails `n` times in a row is deprioritized for
/// `min(min_backoff * 2^(n-1), max_backoff)`. It stays selectable as a last resort.
///
/// # Example
///
/// ```
/// # use std::time::Duration;
/// # use hiero_sdk::NodeHealthConfig;
/// let config = NodeHealthConfig::builder()
///     .min_backoff(Duration::from_secs(2))
///     .max_backoff(Duration::from_secs(60))
///     .build()
///     .expect("valid node health config");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeHealthConfig {
    /// Backoff after the first consecutive failure.
    #[serde(default = "default_node_min_backoff", with = "humantime_serde")]
    pub min_backoff: Duration,
    /// Upper bound on the backoff.
    #[serde(default = "default_node_max_backoff", with = "humantime_serde")]
    pub max_backoff: Duration,
}

#[bon::bon]
impl NodeHealthConfig {
    /// Creates a node health policy with validation.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`](crate::SdkError::Config) if `min_backoff` is zero or
    /// exceeds `max_backoff`.
    #[builder]
    pub fn new(
        #[builder(default = default_node_min_backoff())] min_backoff: Duration,
        #[builder(default = default_node_max_backoff())] max_backoff: Duration,
    ) -> Result<Self> {
        let config = Self { min_backoff, max_backoff };
        config.validate()?;
        Ok(config)
    }
}

impl NodeHealthConfig {
    /// Validates the policy. Call after deserialization.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Config`](crate::SdkError::Config) if a value is out of range.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.min_backoff.is_zero(), ConfigSnafu { message: "min_backoff cannot be zero" });
        ensure!(
            self.min_backoff <= self.max_backoff,
            ConfigSnafu {
                message: format!(
                    "min_backoff ({:?}) must not exceed max_backoff ({:?})",
                    self.min_backoff, self.max_backoff
                )
            }
        );
        Ok(())
    }
}

impl Default for NodeHealthConfig {
    fn default() -> Self {
        Self { min_backoff: default_node_min_backoff(), max_backoff: default_node_max_backoff() }
    }
}

fn default_node_min_backoff() -> Duration {
    Duration::from_secs(8)
}

fn default_node_max_backoff() -> Duration {
    Duration::from_secs(3600)
}

/// Duration serialization using humantime format.
mod humantime_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
