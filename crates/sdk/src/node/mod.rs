//! Node health tracking and per-call node selection.
//!
//! - [`NodeHealthRegistry`]: consecutive-failure counters per node, shared across executions.
//! - [`NodeSelector`]: the ordered candidate list and cursor for one execution.

mod health;
mod selector;

pub use health::{NodeHealthRegistry, NodeHealthSnapshot};
pub use selector::NodeSelector;
