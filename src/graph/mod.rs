//! Dependency graph: typed resource descriptors assembled into a validated DAG.
//!
//! Construction is eager: duplicate ids, unresolved references and cycles are
//! all rejected by [`build_graph`] before any provisioning side effect can
//! occur.

pub mod builder;
pub mod traversal;
pub mod types;

pub use builder::{build_graph, DependencyGraph};
pub use types::{DependencyEdge, ResourceKind, ResourceNode};
