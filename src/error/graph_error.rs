//! Graph-construction error types.
//!
//! These are fatal: if any of them is raised, no plan exists and no
//! provisioning action has run.

use thiserror::Error;

/// Errors raised while assembling resource descriptors into a dependency graph.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("duplicate resource id: {0}")]
    DuplicateNode(String),
    #[error("resource '{node_id}' depends on unknown resource '{reference}'")]
    UnresolvedReference { node_id: String, reference: String },
    #[error("cycle detected in dependency graph: {}", .path.join(" -> "))]
    CycleDetected {
        /// The offending cycle, closed (first id repeated at the end).
        path: Vec<String>,
    },
    #[error("resource not found in graph: {0}")]
    NodeNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_error_display() {
        assert_eq!(
            GraphError::DuplicateNode("db".into()).to_string(),
            "duplicate resource id: db"
        );
        assert_eq!(
            GraphError::UnresolvedReference {
                node_id: "svc".into(),
                reference: "ghost".into()
            }
            .to_string(),
            "resource 'svc' depends on unknown resource 'ghost'"
        );
        assert_eq!(
            GraphError::NodeNotFound("lb".into()).to_string(),
            "resource not found in graph: lb"
        );
    }

    #[test]
    fn test_cycle_error_names_full_path() {
        let err = GraphError::CycleDetected {
            path: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(
            err.to_string(),
            "cycle detected in dependency graph: a -> b -> a"
        );
    }
}
