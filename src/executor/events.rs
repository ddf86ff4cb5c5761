use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::planner::PlanDirection;

use super::status::SkipReason;

/// Engine event, emitted while a plan executes.
///
/// Consumed by CLIs and loggers; the engine does not render them itself.
#[derive(Clone, Debug, Serialize)]
pub enum EngineEvent {
    RunStarted {
        run_id: String,
        direction: PlanDirection,
        node_count: usize,
        timestamp: DateTime<Utc>,
    },
    NodeStarted {
        node_id: String,
        timestamp: DateTime<Utc>,
    },
    NodeSucceeded {
        node_id: String,
        timestamp: DateTime<Utc>,
    },
    NodeFailed {
        node_id: String,
        error: String,
        timestamp: DateTime<Utc>,
    },
    NodeSkipped {
        node_id: String,
        reason: SkipReason,
        timestamp: DateTime<Utc>,
    },
    RunCancelled {
        run_id: String,
        timestamp: DateTime<Utc>,
    },
    RunCompleted {
        run_id: String,
        failed_count: usize,
        timestamp: DateTime<Utc>,
    },
}

pub type EventSender = mpsc::UnboundedSender<EngineEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<EngineEvent>;

/// Create an event channel for one run.
pub fn create_event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}
