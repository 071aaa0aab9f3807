//! SDK-side metrics for observability and operational monitoring.
//!
//! This module provides a pluggable metrics trait (`SdkMetrics`) that SDK users
//! can implement to collect telemetry from the client. Two implementations are
//! included:
//!
//! - [`NoopSdkMetrics`]: Zero-overhead default that discards all metrics.
//! - [`MetricsSdkMetrics`]: Forwards to the [`metrics`](https://docs.rs/metrics) crate facade, and
//!   from there to whatever recorder is installed.
//!
//! # Metric Names
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `hiero_sdk_requests_total` | Counter | `operation`, `status` | Executions by outcome |
//! | `hiero_sdk_request_duration_seconds` | Histogram | `operation` | Execution latency including retries |
//! | `hiero_sdk_retries_total` | Counter | `operation`, `attempt`, `error_type` | Retried attempts |
//! | `hiero_sdk_node_health_transitions_total` | Counter | `node`, `state` | Node marked unhealthy or recovered |
//! | `hiero_sdk_connections_total` | Counter | `address`, `event` | Channel lifecycle events |

use std::{fmt, sync::Arc, time::Duration};

/// Events for channel lifecycle tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A channel was opened and cached.
    Connected,
    /// A cached channel was evicted.
    Disconnected,
    /// Opening a channel failed.
    Failed,
}

impl fmt::Display for ConnectionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => write!(f, "connected"),
            Self::Disconnected => write!(f, "disconnected"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Trait for SDK-side metrics collection.
///
/// All methods have default no-op implementations, so you only need to
/// override the metrics you care about.
pub trait SdkMetrics: Send + Sync + fmt::Debug {
    /// Records the outcome of one `execute` call, after retries resolve.
    fn record_request(&self, operation: &str, duration: Duration, success: bool) {
        let _ = (operation, duration, success);
    }

    /// Records a retry.
    ///
    /// - `attempt`: The attempt about to be made (2 = first retry).
    /// - `error_type`: What triggered the retry (a status name or `connectivity`).
    fn record_retry(&self, operation: &str, attempt: u32, error_type: &str) {
        let _ = (operation, attempt, error_type);
    }

    /// Records a node health transition.
    fn record_node_health(&self, node: &str, healthy: bool) {
        let _ = (node, healthy);
    }

    /// Records a channel lifecycle event.
    fn record_connection(&self, address: &str, event: ConnectionEvent) {
        let _ = (address, event);
    }
}

/// No-op metrics implementation. The default.
#[derive(Debug, Clone, Copy)]
pub struct NoopSdkMetrics;

impl SdkMetrics for NoopSdkMetrics {}

/// Metrics implementation using the `metrics` crate facade.
#[derive(Debug, Clone, Copy)]
pub struct MetricsSdkMetrics;

mod metric_names {
    pub const REQUESTS_TOTAL: &str = "hiero_sdk_requests_total";
    pub const REQUEST_DURATION: &str = "hiero_sdk_request_duration_seconds";
    pub const RETRIES_TOTAL: &str = "hiero_sdk_retries_total";
    pub const NODE_HEALTH_TRANSITIONS_TOTAL: &str = "hiero_sdk_node_health_transitions_total";
    pub const CONNECTIONS_TOTAL: &str = "hiero_sdk_connections_total";
}

impl SdkMetrics for MetricsSdkMetrics {
    fn record_request(&self, operation: &str, duration: Duration, success: bool) {
        let status = if success { "success" } else { "error" };
        metrics::counter!(metric_names::REQUESTS_TOTAL, "operation" => operation.to_owned(), "status" => status)
            .increment(1);
        metrics::histogram!(metric_names::REQUEST_DURATION, "operation" => operation.to_owned())
            .record(duration.as_secs_f64());
    }

    fn record_retry(&self, operation: &str, attempt: u32, error_type: &str) {
        metrics::counter!(
            metric_names::RETRIES_TOTAL,
            "operation" => operation.to_owned(),
            "attempt" => attempt.to_string(),
            "error_type" => error_type.to_owned(),
        )
        .increment(1);
    }

    fn record_node_health(&self, node: &str, healthy: bool) {
        let state = if healthy { "healthy" } else { "unhealthy" };
        metrics::counter!(
            metric_names::NODE_HEALTH_TRANSITIONS_TOTAL,
            "node" => node.to_owned(),
            "state" => state,
        )
        .increment(1);
    }

    fn record_connection(&self, address: &str, event: ConnectionEvent) {
        metrics::counter!(
            metric_names::CONNECTIONS_TOTAL,
            "address" => address.to_owned(),
            "event" => event.to_string(),
        )
        .increment(1);
    }
}

/// Creates the default metrics instance (no-op).
pub(crate) fn default_metrics() -> Arc<dyn SdkMetrics> {
    Arc::new(NoopSdkMetrics)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::*;

    #[derive(Debug, Default)]
    struct CountingMetrics {
        requests: AtomicU64,
        retries: AtomicU64,
        health: AtomicU64,
    }

    impl SdkMetrics for CountingMetrics {
        fn record_request(&self, _operation: &str, _duration: Duration, _success: bool) {
            self.requests.fetch_add(1, Ordering::Relaxed);
        }

        fn record_retry(&self, _operation: &str, _attempt: u32, _error_type: &str) {
            self.retries.fetch_add(1, Ordering::Relaxed);
        }

        fn record_node_health(&self, _node: &str, _healthy: bool) {
            self.health.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn test_noop_metrics_accepts_all_calls() {
        let m = NoopSdkMetrics;
        m.record_request("TransferTransaction", Duration::from_millis(5), true);
        m.record_retry("TransferTransaction", 2, "BUSY");
        m.record_node_health("0.0.3", false);
        m.record_connection("node3:50211", ConnectionEvent::Connected);
    }

    #[test]
    fn test_facade_metrics_without_recorder() {
        // No recorder installed: the facade discards silently.
        let m = MetricsSdkMetrics;
        m.record_request("TransactionReceiptQuery", Duration::from_millis(12), false);
        m.record_retry("TransactionReceiptQuery", 3, "connectivity");
        m.record_node_health("0.0.4", true);
        m.record_connection("node4:50211", ConnectionEvent::Failed);
    }

    #[test]
    fn test_custom_metrics_via_trait_object() {
        let counting = Arc::new(CountingMetrics::default());
        let m: Arc<dyn SdkMetrics> = counting.clone();

        m.record_request("op", Duration::ZERO, true);
        m.record_retry("op", 2, "BUSY");
        m.record_retry("op", 3, "BUSY");
        m.record_node_health("0.0.3", false);
        m.record_connection("addr", ConnectionEvent::Disconnected);

        assert_eq!(counting.requests.load(Ordering::Relaxed), 1);
        assert_eq!(counting.retries.load(Ordering::Relaxed), 2);
        assert_eq!(counting.health.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_connection_event_display() {
        assert_eq!(ConnectionEvent::Connected.to_string(), "connected");
        assert_eq!(ConnectionEvent::Disconnected.to_string(), "disconnected");
        assert_eq!(ConnectionEvent::Failed.to_string(), "failed");
    }
}
