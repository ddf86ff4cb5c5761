//! Durable per-resource state, enabling idempotent re-runs.
//!
//! The store is the only shared mutable resource of a run; exactly one
//! executor owns a given state namespace at a time, so last-write-wins is
//! sufficient.

pub mod record;
pub mod store;

pub use record::StateRecord;
pub use store::{FileStateStore, MemoryStateStore, StateStore};
