//! High-level deployment runner and builder.
//!
//! [`DeploymentRunner`] (constructed via [`DeploymentRunnerBuilder`]) is the
//! main entry point: it wires together the graph builder, planner, executor,
//! provisioner, and state store for one deployment.

use std::sync::Arc;

use crate::descriptor::DeploymentSchema;
use crate::error::EngineResult;
use crate::executor::{EngineConfig, EventSender, ExecutionReport, PlanExecutor, StopSignal};
use crate::graph::{build_graph, DependencyGraph, ResourceNode};
use crate::planner::{plan_apply, plan_destroy, ExecutionPlan};
use crate::provision::{Provisioner, StaticProvisioner};
use crate::state::{MemoryStateStore, StateStore};

/// Runs apply and destroy plans for one validated deployment graph.
pub struct DeploymentRunner {
    graph: DependencyGraph,
    config: EngineConfig,
    provisioner: Arc<dyn Provisioner>,
    state_store: Arc<dyn StateStore>,
    events: Option<EventSender>,
    stop_signal: StopSignal,
}

impl DeploymentRunner {
    /// Create a builder from resource descriptors.
    pub fn builder(nodes: Vec<ResourceNode>) -> DeploymentRunnerBuilder {
        DeploymentRunnerBuilder {
            nodes,
            config: EngineConfig::default(),
            provisioner: None,
            state_store: None,
            events: None,
            stop_signal: None,
        }
    }

    /// Create a builder from a parsed deployment document.
    pub fn from_schema(schema: DeploymentSchema) -> DeploymentRunnerBuilder {
        Self::builder(schema.into_nodes())
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// The apply order this runner would execute.
    pub fn plan(&self) -> EngineResult<ExecutionPlan> {
        Ok(plan_apply(&self.graph)?)
    }

    /// Handle for cancelling a run in progress.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop_signal.clone()
    }

    /// Plan and execute an apply.
    pub async fn apply(&self) -> EngineResult<ExecutionReport> {
        let plan = plan_apply(&self.graph)?;
        self.executor()
            .execute(
                &plan,
                &self.graph,
                self.provisioner.clone(),
                self.state_store.clone(),
            )
            .await
    }

    /// Plan and execute a destroy (the reverse of the apply order).
    pub async fn destroy(&self) -> EngineResult<ExecutionReport> {
        let plan = plan_destroy(&self.graph)?;
        self.executor()
            .execute(
                &plan,
                &self.graph,
                self.provisioner.clone(),
                self.state_store.clone(),
            )
            .await
    }

    fn executor(&self) -> PlanExecutor {
        let mut executor =
            PlanExecutor::new(self.config.clone()).with_stop_signal(self.stop_signal.clone());
        if let Some(events) = &self.events {
            executor = executor.with_events(events.clone());
        }
        executor
    }
}

/// Builder for [`DeploymentRunner`].
pub struct DeploymentRunnerBuilder {
    nodes: Vec<ResourceNode>,
    config: EngineConfig,
    provisioner: Option<Arc<dyn Provisioner>>,
    state_store: Option<Arc<dyn StateStore>>,
    events: Option<EventSender>,
    stop_signal: Option<StopSignal>,
}

impl DeploymentRunnerBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn provisioner(mut self, provisioner: Arc<dyn Provisioner>) -> Self {
        self.provisioner = Some(provisioner);
        self
    }

    pub fn state_store(mut self, state_store: Arc<dyn StateStore>) -> Self {
        self.state_store = Some(state_store);
        self
    }

    pub fn events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    pub fn stop_signal(mut self, stop_signal: StopSignal) -> Self {
        self.stop_signal = Some(stop_signal);
        self
    }

    /// Validate the descriptors into a graph and finish the runner.
    ///
    /// Fails here, before any side effect, if the descriptors contain a
    /// duplicate id, an unresolved reference, or a cycle.
    pub fn build(self) -> EngineResult<DeploymentRunner> {
        let graph = build_graph(self.nodes)?;
        Ok(DeploymentRunner {
            graph,
            config: self.config,
            provisioner: self
                .provisioner
                .unwrap_or_else(|| Arc::new(StaticProvisioner)),
            state_store: self
                .state_store
                .unwrap_or_else(|| Arc::new(MemoryStateStore::new())),
            events: self.events,
            stop_signal: self.stop_signal.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{parse_descriptors, DescriptorFormat};
    use crate::error::EngineError;
    use crate::executor::NodeStatus;
    use crate::graph::ResourceKind;

    fn node(id: &str, deps: &[&str]) -> ResourceNode {
        ResourceNode::new(id, ResourceKind::Other).with_dependencies(deps.iter().copied())
    }

    #[tokio::test]
    async fn test_runner_apply_defaults() {
        let runner = DeploymentRunner::builder(vec![
            node("net", &[]),
            node("cluster", &["net"]),
        ])
        .build()
        .unwrap();

        let report = runner.apply().await.unwrap();
        assert!(report.is_success());
        assert_eq!(report.status_of("cluster"), Some(NodeStatus::Succeeded));
    }

    #[tokio::test]
    async fn test_runner_rejects_cycle_at_build() {
        let result = DeploymentRunner::builder(vec![node("a", &["b"]), node("b", &["a"])]).build();
        assert!(matches!(result.err(), Some(EngineError::Graph(_))));
    }

    #[tokio::test]
    async fn test_runner_from_yaml_schema() {
        let yaml = r#"
name: demo
resources:
  - id: network
    kind: network
  - id: service
    kind: service
    depends_on: [network]
"#;
        let schema = parse_descriptors(yaml, DescriptorFormat::Yaml).unwrap();
        let runner = DeploymentRunner::from_schema(schema).build().unwrap();

        let plan = runner.plan().unwrap();
        assert_eq!(plan.node_ids, vec!["network", "service"]);

        let report = runner.apply().await.unwrap();
        assert!(report.is_success());
    }
}
