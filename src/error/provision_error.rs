//! Errors returned by provisioning actions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a single provisioning action.
///
/// The engine treats these as opaque: a failed action marks the resource
/// `Failed` and its transitive dependents `Skipped`, and the message is
/// surfaced in the [`ExecutionReport`](crate::executor::ExecutionReport).
/// The engine never retries; retry policy belongs to the provisioner or its
/// caller.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum ProvisionError {
    /// The remote side rejected the request (bad properties, conflicts).
    #[error("provisioning rejected: {0}")]
    Rejected(String),
    /// The action started but did not complete.
    #[error("provisioning action failed: {0}")]
    ActionFailed(String),
    /// The provisioner has no handler for this resource kind.
    #[error("unsupported resource kind: {0}")]
    UnsupportedKind(String),
}
