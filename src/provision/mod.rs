//! The provisioning boundary: the one capability that touches real
//! infrastructure.
//!
//! The engine only ever sees the [`Provisioner`] trait. Every network call,
//! credential, and provider SDK lives behind it, keeping the graph and
//! planning logic deterministic.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ProvisionError;
use crate::graph::ResourceNode;

/// Applies or destroys one real resource.
///
/// `apply` returns the resolved properties of the created or updated
/// resource; they are persisted as the resource's last-applied state. The
/// engine never retries a failed action.
#[async_trait]
pub trait Provisioner: Send + Sync {
    async fn apply(&self, node: &ResourceNode) -> Result<Value, ProvisionError>;
    async fn destroy(&self, node: &ResourceNode) -> Result<(), ProvisionError>;
}

/// In-process provisioner that resolves every action immediately, echoing
/// the declared properties back. Useful for demos, dry runs, and tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticProvisioner;

#[async_trait]
impl Provisioner for StaticProvisioner {
    async fn apply(&self, node: &ResourceNode) -> Result<Value, ProvisionError> {
        tracing::debug!(node_id = %node.id, kind = %node.kind, "static apply");
        Ok(node.properties.clone())
    }

    async fn destroy(&self, node: &ResourceNode) -> Result<(), ProvisionError> {
        tracing::debug!(node_id = %node.id, kind = %node.kind, "static destroy");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ResourceKind;
    use serde_json::json;

    #[tokio::test]
    async fn test_static_provisioner_echoes_properties() {
        let node = ResourceNode::new("net", ResourceKind::Network)
            .with_properties(json!({"cidr": "10.0.0.0/16"}));

        let props = StaticProvisioner.apply(&node).await.unwrap();
        assert_eq!(props, json!({"cidr": "10.0.0.0/16"}));
        StaticProvisioner.destroy(&node).await.unwrap();
    }
}
