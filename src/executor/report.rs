use serde::{Deserialize, Serialize};

use crate::planner::PlanDirection;

use super::status::{NodeStatus, SkipReason};

/// Final state of one node after a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeOutcome {
    pub node_id: String,
    pub status: NodeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<SkipReason>,
    /// First error observed for this node, present only when `status` is
    /// `Failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Structured result of one plan execution, with outcomes in plan order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReport {
    pub run_id: String,
    pub direction: PlanDirection,
    pub cancelled: bool,
    pub outcomes: Vec<NodeOutcome>,
}

impl ExecutionReport {
    pub fn status_of(&self, node_id: &str) -> Option<NodeStatus> {
        self.outcomes
            .iter()
            .find(|o| o.node_id == node_id)
            .map(|o| o.status)
    }

    pub fn skip_reason_of(&self, node_id: &str) -> Option<SkipReason> {
        self.outcomes
            .iter()
            .find(|o| o.node_id == node_id)
            .and_then(|o| o.skip_reason)
    }

    pub fn error_of(&self, node_id: &str) -> Option<&str> {
        self.outcomes
            .iter()
            .find(|o| o.node_id == node_id)
            .and_then(|o| o.error.as_deref())
    }

    pub fn failed_nodes(&self) -> Vec<&str> {
        self.nodes_with(NodeStatus::Failed)
    }

    pub fn skipped_nodes(&self) -> Vec<&str> {
        self.nodes_with(NodeStatus::Skipped)
    }

    pub fn succeeded_nodes(&self) -> Vec<&str> {
        self.nodes_with(NodeStatus::Succeeded)
    }

    /// True when nothing failed and the run was not cancelled.
    pub fn is_success(&self) -> bool {
        !self.cancelled && self.failed_nodes().is_empty()
    }

    fn nodes_with(&self, status: NodeStatus) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.status == status)
            .map(|o| o.node_id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> ExecutionReport {
        ExecutionReport {
            run_id: "run-1".to_string(),
            direction: PlanDirection::Apply,
            cancelled: false,
            outcomes: vec![
                NodeOutcome {
                    node_id: "net".into(),
                    status: NodeStatus::Succeeded,
                    skip_reason: None,
                    error: None,
                },
                NodeOutcome {
                    node_id: "cluster".into(),
                    status: NodeStatus::Failed,
                    skip_reason: None,
                    error: Some("quota exceeded".into()),
                },
                NodeOutcome {
                    node_id: "svc".into(),
                    status: NodeStatus::Skipped,
                    skip_reason: Some(SkipReason::DependencyFailed),
                    error: None,
                },
            ],
        }
    }

    #[test]
    fn test_report_accessors() {
        let report = report();
        assert_eq!(report.status_of("net"), Some(NodeStatus::Succeeded));
        assert_eq!(report.failed_nodes(), vec!["cluster"]);
        assert_eq!(report.skipped_nodes(), vec!["svc"]);
        assert_eq!(report.error_of("cluster"), Some("quota exceeded"));
        assert_eq!(
            report.skip_reason_of("svc"),
            Some(SkipReason::DependencyFailed)
        );
        assert!(!report.is_success());
    }

    #[test]
    fn test_report_serializes() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["outcomes"][1]["error"], "quota exceeded");
        assert!(json["outcomes"][0].get("error").is_none());
    }
}
