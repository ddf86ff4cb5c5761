use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::executor::status::NodeStatus;
use crate::graph::ResourceNode;

/// Last-known state of one resource, as persisted by the state store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub node_id: String,
    pub last_status: NodeStatus,
    /// Properties the last successful apply ran with. Compared against the
    /// current descriptor to decide whether a re-apply may be skipped.
    pub last_applied_properties: Value,
    pub updated_at: DateTime<Utc>,
}

impl StateRecord {
    pub fn succeeded(node_id: impl Into<String>, properties: Value) -> Self {
        StateRecord {
            node_id: node_id.into(),
            last_status: NodeStatus::Succeeded,
            last_applied_properties: properties,
            updated_at: Utc::now(),
        }
    }

    pub fn failed(node_id: impl Into<String>, properties: Value) -> Self {
        StateRecord {
            node_id: node_id.into(),
            last_status: NodeStatus::Failed,
            last_applied_properties: properties,
            updated_at: Utc::now(),
        }
    }

    /// True when a re-apply of `node` may be skipped: the last run succeeded
    /// and the declared properties are unchanged.
    pub fn is_up_to_date(&self, node: &ResourceNode) -> bool {
        self.last_status == NodeStatus::Succeeded
            && self.last_applied_properties == node.properties
    }
}
