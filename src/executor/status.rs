//! Node status — the canonical definition of per-resource execution states.

use serde::{Deserialize, Serialize};

/// Lifecycle status of one resource node within a run.
///
/// `Pending` at plan start, `InProgress` once the provisioning action is
/// dispatched, then exactly one of the terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeStatus {
    Pending,
    InProgress,
    Succeeded,
    Failed,
    Skipped,
}

impl NodeStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            NodeStatus::Succeeded | NodeStatus::Failed | NodeStatus::Skipped
        )
    }
}

/// Why a node ended `Skipped`.
///
/// The distinction matters for scheduling: an up-to-date skip satisfies the
/// node's dependents exactly as a success would, while the other two block
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// State store already holds a successful run with identical properties
    /// (idempotent re-apply), or nothing to destroy.
    UpToDate,
    /// A transitive dependency failed or was itself blocked.
    DependencyFailed,
    /// Cancellation was signaled before the node was dispatched.
    Cancelled,
}

impl SkipReason {
    /// Whether a node skipped for this reason still satisfies its dependents.
    pub fn satisfies_dependents(&self) -> bool {
        matches!(self, SkipReason::UpToDate)
    }
}
