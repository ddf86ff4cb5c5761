//! State store error types.

use thiserror::Error;

/// Errors from the durable state store.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("state record corrupted: {0}")]
    Corrupted(String),
}
