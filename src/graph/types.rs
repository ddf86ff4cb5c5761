use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Category of an infrastructure resource.
///
/// The built-in variants cover the vocabulary of a container deployment
/// (network, cluster, shared filesystem, task definition, load balancer,
/// service); anything else maps to [`ResourceKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Network,
    Cluster,
    FileSystem,
    TaskDefinition,
    Service,
    LoadBalancer,
    Other,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Network => "network",
            ResourceKind::Cluster => "cluster",
            ResourceKind::FileSystem => "file-system",
            ResourceKind::TaskDefinition => "task-definition",
            ResourceKind::Service => "service",
            ResourceKind::LoadBalancer => "load-balancer",
            ResourceKind::Other => "other",
        }
    }
}

// Unknown kinds map to `Other` instead of failing the parse, so descriptor
// documents can name kinds this engine has no built-in vocabulary for.
impl<'de> Deserialize<'de> for ResourceKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "network" => ResourceKind::Network,
            "cluster" => ResourceKind::Cluster,
            "file-system" => ResourceKind::FileSystem,
            "task-definition" => ResourceKind::TaskDefinition,
            "service" => ResourceKind::Service,
            "load-balancer" => ResourceKind::LoadBalancer,
            _ => ResourceKind::Other,
        })
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared infrastructure resource and its dependency set.
///
/// Immutable once inserted into a [`DependencyGraph`](super::DependencyGraph);
/// the executor reads it, the provisioner receives it, nothing mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    /// Unique id within one deployment.
    pub id: String,
    /// Resource category.
    pub kind: ResourceKind,
    /// Declared configuration, passed verbatim to the provisioning action.
    #[serde(default)]
    pub properties: Value,
    /// Ids of resources that must be provisioned before this one.
    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl ResourceNode {
    pub fn new(id: impl Into<String>, kind: ResourceKind) -> Self {
        ResourceNode {
            id: id.into(),
            kind,
            properties: Value::Object(serde_json::Map::new()),
            depends_on: Vec::new(),
        }
    }

    pub fn with_properties(mut self, properties: Value) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_dependencies<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends_on = ids.into_iter().map(Into::into).collect();
        self
    }
}

/// Graph edge: `dependency` must reach a terminal status before `dependent`
/// may start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    pub dependency: String,
    pub dependent: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_kind_serde() {
        let kind: ResourceKind = serde_json::from_str("\"task-definition\"").unwrap();
        assert_eq!(kind, ResourceKind::TaskDefinition);
        assert_eq!(
            serde_json::to_string(&ResourceKind::LoadBalancer).unwrap(),
            "\"load-balancer\""
        );
    }

    #[test]
    fn test_resource_kind_unknown_maps_to_other() {
        let kind: ResourceKind = serde_json::from_str("\"quantum-annealer\"").unwrap();
        assert_eq!(kind, ResourceKind::Other);
    }

    #[test]
    fn test_resource_node_builder() {
        let node = ResourceNode::new("svc", ResourceKind::Service)
            .with_properties(json!({"replicas": 2}))
            .with_dependencies(["cluster", "task"]);
        assert_eq!(node.id, "svc");
        assert_eq!(node.depends_on, vec!["cluster", "task"]);
        assert_eq!(node.properties["replicas"], 2);
    }
}
