//! # stackplan — a declarative resource-graph planner and executor
//!
//! `stackplan` compiles a set of infrastructure resource descriptors into a
//! validated dependency DAG, produces deterministic apply/destroy plans, and
//! executes them against a caller-supplied provisioning capability:
//!
//! - **Graph construction**: eager validation of duplicate ids, unresolved
//!   references, and cycles (with the full cycle path in the error) before
//!   any side effect occurs.
//! - **Deterministic planning**: topological apply order with discovery-index
//!   tie-breaking; destroy is the exact reverse, so destroy undoes apply.
//! - **Concurrent execution**: independent branches of the plan run in
//!   parallel; a node never starts before all its dependencies reached a
//!   terminal status.
//! - **Partial-failure isolation**: a failed provisioning action marks its
//!   transitive dependents skipped while unrelated branches keep going.
//! - **Idempotent re-runs**: a durable state store records each resource's
//!   last applied properties; unchanged resources are skipped.
//! - **Cooperative cancellation**: in-flight actions run to completion,
//!   nothing new starts, pending nodes are skipped.
//!
//! The actual cloud API calls live behind the [`Provisioner`] trait; the
//! engine never inspects them and never retries them.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use stackplan::{parse_descriptors, DeploymentRunner, DescriptorFormat};
//!
//! #[tokio::main]
//! async fn main() {
//!     let yaml = std::fs::read_to_string("deployment.yaml").unwrap();
//!     let schema = parse_descriptors(&yaml, DescriptorFormat::Yaml).unwrap();
//!     let runner = DeploymentRunner::from_schema(schema).build().unwrap();
//!     let report = runner.apply().await.unwrap();
//!     println!("{:?}", report);
//! }
//! ```

pub mod api;
pub mod descriptor;
pub mod error;
pub mod executor;
pub mod graph;
pub mod planner;
pub mod provision;
pub mod state;

pub use crate::api::{DeploymentRunner, DeploymentRunnerBuilder};
pub use crate::descriptor::{parse_descriptors, DeploymentSchema, DescriptorFormat, ResourceSchema};
pub use crate::error::{
    EngineError, EngineResult, GraphError, GraphResult, ProvisionError, StateError,
};
pub use crate::executor::{
    create_event_channel, EngineConfig, EngineEvent, EventReceiver, EventSender, ExecutionReport,
    NodeOutcome, NodeStatus, PlanExecutor, SkipReason, StopSignal,
};
pub use crate::graph::{build_graph, DependencyGraph, ResourceKind, ResourceNode};
pub use crate::planner::{plan_apply, plan_destroy, ExecutionPlan, PlanDirection};
pub use crate::provision::{Provisioner, StaticProvisioner};
pub use crate::state::{FileStateStore, MemoryStateStore, StateRecord, StateStore};
