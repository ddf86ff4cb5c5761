use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::graph::{ResourceKind, ResourceNode};

/// One resource entry in a deployment document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSchema {
    pub id: String,
    pub kind: ResourceKind,
    #[serde(default)]
    pub properties: Value,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

/// A parsed deployment document: a named set of resource descriptors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentSchema {
    #[serde(default)]
    pub name: Option<String>,
    pub resources: Vec<ResourceSchema>,
}

impl DeploymentSchema {
    /// Convert into graph nodes, preserving document order.
    pub fn into_nodes(self) -> Vec<ResourceNode> {
        self.resources
            .into_iter()
            .map(|r| ResourceNode {
                id: r.id,
                kind: r.kind,
                properties: r.properties,
                depends_on: r.depends_on,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_into_nodes_preserves_order() {
        let schema = DeploymentSchema {
            name: Some("ci".into()),
            resources: vec![
                ResourceSchema {
                    id: "net".into(),
                    kind: ResourceKind::Network,
                    properties: json!({}),
                    depends_on: vec![],
                },
                ResourceSchema {
                    id: "cluster".into(),
                    kind: ResourceKind::Cluster,
                    properties: json!({}),
                    depends_on: vec!["net".into()],
                },
            ],
        };

        let nodes = schema.into_nodes();
        assert_eq!(nodes[0].id, "net");
        assert_eq!(nodes[1].depends_on, vec!["net"]);
    }
}
