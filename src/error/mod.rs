//! Error types for the planning engine.
//!
//! - [`GraphError`] — Errors raised while building or querying the dependency graph.
//! - [`ProvisionError`] — Errors returned by a provisioning action for one resource.
//! - [`StateError`] — Errors from the durable state store.
//! - [`EngineError`] — Top-level errors for planning and plan execution.

pub mod engine_error;
pub mod graph_error;
pub mod provision_error;
pub mod state_error;

pub use engine_error::EngineError;
pub use graph_error::GraphError;
pub use provision_error::ProvisionError;
pub use state_error::StateError;

/// Convenience alias for engine-level results.
pub type EngineResult<T> = Result<T, EngineError>;
/// Convenience alias for graph-construction results.
pub type GraphResult<T> = Result<T, GraphError>;
