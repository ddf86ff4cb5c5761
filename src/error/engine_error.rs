//! Top-level engine error type.

use thiserror::Error;

use super::{GraphError, StateError};

/// Engine-level errors.
///
/// Per-resource provisioning failures are not represented here: they are
/// recovered locally by the executor and reported through the
/// [`ExecutionReport`](crate::executor::ExecutionReport).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("descriptor parse error: {0}")]
    DescriptorParse(String),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error("plan does not match graph: {0}")]
    PlanMismatch(String),
    #[error("internal error: {0}")]
    Internal(String),
}
