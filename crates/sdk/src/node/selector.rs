//! Node selection for a single execution.

use hiero_types::AccountId;

use super::NodeHealthRegistry;

/// Ordered candidates and a cursor for one execution call.
///
/// Candidates are ordered healthy first, then by fewest consecutive failures, then by the
/// oldest last failure. Ties keep the caller's order. The order is recomputed each time the
/// cursor wraps, so a node that failed during this call moves back.
#[derive(Debug, Clone)]
pub struct NodeSelector {
    candidates: Vec<AccountId>,
    cursor: usize,
    rotations: u32,
    health: NodeHealthRegistry,
}

impl NodeSelector {
    /// Creates a selector over `candidates`.
    ///
    /// Returns `None` if `candidates` is empty.
    #[must_use]
    pub fn new(candidates: Vec<AccountId>, health: NodeHealthRegistry) -> Option<Self> {
        if candidates.is_empty() {
            return None;
        }
        let mut selector = Self { candidates, cursor: 0, rotations: 0, health };
        selector.reorder();
        Some(selector)
    }

    fn reorder(&mut self) {
        let health = &self.health;
        self.candidates.sort_by_cached_key(|node| {
            let snapshot = health.snapshot(node);
            (!snapshot.healthy, snapshot.consecutive_failures, snapshot.last_failure)
        });
    }

    /// Returns the node the next attempt targets.
    #[must_use]
    pub fn current(&self) -> AccountId {
        self.candidates[self.cursor]
    }

    /// Moves to the next candidate and returns it.
    pub fn advance(&mut self) -> AccountId {
        self.rotations = self.rotations.saturating_add(1);
        self.cursor += 1;
        if self.cursor >= self.candidates.len() {
            self.cursor = 0;
            self.reorder();
        }
        self.current()
    }

    /// Returns how many times the cursor moved.
    #[must_use]
    pub fn rotations(&self) -> u32 {
        self.rotations
    }

    /// Returns the candidates in their current order.
    #[must_use]
    pub fn candidates(&self) -> &[AccountId] {
        &self.candidates
    }
}
