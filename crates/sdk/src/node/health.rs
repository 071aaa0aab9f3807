//! Process-wide node health registry.
//!
//! Each node carries a consecutive-failure counter and the time it becomes eligible again.
//! Counters are atomics updated once per attempt; readers may observe slightly stale values,
//! which only affects ordering.

use std::{
    sync::{
        Arc, OnceLock,
        atomic::{AtomicU32, AtomicU64, Ordering},
    },
    time::Duration,
};

use dashmap::DashMap;
use hiero_types::AccountId;
use tokio::time::Instant;

use crate::config::NodeHealthConfig;

#[derive(Debug, Default)]
struct NodeHealth {
    consecutive_failures: AtomicU32,
    /// Milliseconds since the registry epoch, plus one. Zero means never failed.
    last_failure_ms: AtomicU64,
    /// Milliseconds since the registry epoch.
    readmit_at_ms: AtomicU64,
}

#[derive(Debug)]
struct Inner {
    nodes: DashMap<AccountId, NodeHealth>,
    epoch: Instant,
    config: NodeHealthConfig,
}

/// Point-in-time view of one node's health.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHealthSnapshot {
    /// Failures since the last success.
    pub consecutive_failures: u32,
    /// Time of the last failure, relative to the registry epoch.
    pub last_failure: Option<Duration>,
    /// Whether the readmission backoff has elapsed.
    pub healthy: bool,
}

impl NodeHealthSnapshot {
    const UNTOUCHED: Self = Self { consecutive_failures: 0, last_failure: None, healthy: true };
}

/// Shared per-node failure tracking.
///
/// Cloning is cheap; clones share state.
#[derive(Debug, Clone)]
pub struct NodeHealthRegistry {
    inner: Arc<Inner>,
}

impl Default for NodeHealthRegistry {
    fn default() -> Self {
        Self::new(NodeHealthConfig::default())
    }
}

impl NodeHealthRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(config: NodeHealthConfig) -> Self {
        Self { inner: Arc::new(Inner { nodes: DashMap::new(), epoch: Instant::now(), config }) }
    }

    /// Returns the process-wide registry.
    #[must_use]
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<NodeHealthRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::default)
    }

    /// Returns the readmission policy.
    #[must_use]
    pub fn config(&self) -> &NodeHealthConfig {
        &self.inner.config
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.inner.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn backoff_for(&self, failures: u32) -> Duration {
        let max = self.inner.config.max_backoff;
        let shift = failures.saturating_sub(1).min(31);
        self.inner.config.min_backoff.checked_mul(1_u32 << shift).map_or(max, |d| d.min(max))
    }

    /// Records a failed attempt against `node` and returns its consecutive failure count.
    pub fn record_failure(&self, node: &AccountId) -> u32 {
        let now = self.elapsed_ms();
        let entry = self.inner.nodes.entry(*node).or_default();

        let failures = entry.consecutive_failures.fetch_add(1, Ordering::AcqRel).saturating_add(1);
        let backoff = self.backoff_for(failures);
        let backoff_ms = u64::try_from(backoff.as_millis()).unwrap_or(u64::MAX);

        entry.last_failure_ms.store(now.saturating_add(1), Ordering::Release);
        entry.readmit_at_ms.store(now.saturating_add(backoff_ms), Ordering::Release);
        drop(entry);

        if failures == 1 {
            tracing::warn!(node = %node, backoff_ms, "node marked unhealthy");
        } else {
            tracing::debug!(node = %node, failures, backoff_ms, "node failed again");
        }
        failures
    }

    /// Records a successful attempt against `node`.
    ///
    /// Returns true if the node had been failing.
    pub fn record_success(&self, node: &AccountId) -> bool {
        let Some(entry) = self.inner.nodes.get(node) else {
            return false;
        };
        let previous = entry.consecutive_failures.swap(0, Ordering::AcqRel);
        entry.readmit_at_ms.store(0, Ordering::Release);
        drop(entry);

        if previous > 0 {
            tracing::debug!(node = %node, previous_failures = previous, "node recovered");
        }
        previous > 0
    }

    /// Returns whether `node` is past its readmission backoff.
    #[must_use]
    pub fn is_healthy(&self, node: &AccountId) -> bool {
        self.snapshot(node).healthy
    }

    /// Returns the current health of `node`.
    #[must_use]
    pub fn snapshot(&self, node: &AccountId) -> NodeHealthSnapshot {
        let Some(entry) = self.inner.nodes.get(node) else {
            return NodeHealthSnapshot::UNTOUCHED;
        };
        let last_failure = match entry.last_failure_ms.load(Ordering::Acquire) {
            0 => None,
            ms => Some(Duration::from_millis(ms - 1)),
        };
        NodeHealthSnapshot {
            consecutive_failures: entry.consecutive_failures.load(Ordering::Acquire),
            last_failure,
            healthy: entry.readmit_at_ms.load(Ordering::Acquire) <= self.elapsed_ms(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn node(num: u64) -> AccountId {
        AccountId::new(0, 0, num)
    }

    fn registry() -> NodeHealthRegistry {
        NodeHealthRegistry::new(
            NodeHealthConfig::builder()
                .min_backoff(Duration::from_secs(1))
                .max_backoff(Duration::from_secs(4))
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_untouched_node_is_healthy() {
        let registry = registry();
        assert_eq!(registry.snapshot(&node(3)), NodeHealthSnapshot::UNTOUCHED);
        assert!(!registry.record_success(&node(3)));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let registry = registry();
        assert_eq!(registry.backoff_for(1), Duration::from_secs(1));
        assert_eq!(registry.backoff_for(2), Duration::from_secs(2));
        assert_eq!(registry.backoff_for(3), Duration::from_secs(4));
        assert_eq!(registry.backoff_for(30), Duration::from_secs(4));
        assert_eq!(registry.backoff_for(u32::MAX), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_then_readmission() {
        let registry = registry();
        assert_eq!(registry.record_failure(&node(3)), 1);
        assert!(!registry.is_healthy(&node(3)));

        tokio::time::advance(Duration::from_millis(1001)).await;
        assert!(registry.is_healthy(&node(3)));
        assert_eq!(registry.snapshot(&node(3)).consecutive_failures, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_resets() {
        let registry = registry();
        registry.record_failure(&node(3));
        registry.record_failure(&node(3));
        assert!(registry.record_success(&node(3)));

        let snapshot = registry.snapshot(&node(3));
        assert_eq!(snapshot.consecutive_failures, 0);
        assert!(snapshot.healthy);
        assert!(snapshot.last_failure.is_some());
    }

    #[test]
    fn test_clones_share_state() {
        let registry = registry();
        let clone = registry.clone();
        clone.record_failure(&node(4));
        assert_eq!(registry.snapshot(&node(4)).consecutive_failures, 1);
    }

    #[test]
    fn test_concurrent_failures_are_not_lost() {
        let registry = registry();
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        registry.record_failure(&node(5));
                    }
                });
            }
        });
        assert_eq!(registry.snapshot(&node(5)).consecutive_failures, 800);
    }

    #[test]
    fn test_global_is_shared() {
        let a = NodeHealthRegistry::global();
        let b = NodeHealthRegistry::global();
        assert!(Arc::ptr_eq(&a.inner, &b.inner));
    }
}
