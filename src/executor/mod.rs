//! Plan executor: drives a planned sequence of provisioning actions.
//!
//! Independent branches of the plan run concurrently; a node is dispatched
//! only once every dependency (in plan direction) has reached a terminal
//! status. Failures are isolated per branch and surfaced in the final
//! [`ExecutionReport`] rather than thrown up the call stack.

pub mod dispatcher;
pub mod events;
pub mod report;
pub mod status;
pub mod stop;

pub use dispatcher::{EngineConfig, PlanExecutor};
pub use events::{create_event_channel, EngineEvent, EventReceiver, EventSender};
pub use report::{ExecutionReport, NodeOutcome};
pub use status::{NodeStatus, SkipReason};
pub use stop::StopSignal;
