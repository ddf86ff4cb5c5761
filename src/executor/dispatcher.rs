//! Plan dispatcher — the main execution driver.
//!
//! [`PlanExecutor`] walks an [`ExecutionPlan`] over its [`DependencyGraph`],
//! invoking the caller-supplied [`Provisioner`] for each node, consulting
//! the [`StateStore`] for idempotent skips, isolating per-branch failures,
//! and honoring cooperative cancellation between node dispatches.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::task::JoinSet;

use crate::error::{EngineError, EngineResult, ProvisionError};
use crate::graph::DependencyGraph;
use crate::planner::{ExecutionPlan, PlanDirection};
use crate::provision::Provisioner;
use crate::state::{StateRecord, StateStore};

use super::events::{EngineEvent, EventSender};
use super::report::{ExecutionReport, NodeOutcome};
use super::status::{NodeStatus, SkipReason};
use super::stop::StopSignal;

/// Configuration for the plan executor.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EngineConfig {
    /// Run independent branches concurrently.
    #[serde(default = "default_parallel_enabled")]
    pub parallel_enabled: bool,
    /// Upper bound on concurrent provisioning actions; 0 means unbounded.
    #[serde(default)]
    pub max_concurrency: usize,
}

fn default_parallel_enabled() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            parallel_enabled: true,
            max_concurrency: 0,
        }
    }
}

struct TaskOutcome {
    node_id: String,
    /// `Some(properties)` for apply, `None` for destroy.
    result: Result<Option<Value>, ProvisionError>,
}

struct RunState {
    statuses: HashMap<String, NodeStatus>,
    skip_reasons: HashMap<String, SkipReason>,
    errors: HashMap<String, String>,
    /// Outstanding plan-direction dependencies per node.
    remaining_deps: HashMap<String, usize>,
    plan_position: HashMap<String, usize>,
}

/// The plan executor: drives planned provisioning.
pub struct PlanExecutor {
    config: EngineConfig,
    events: Option<EventSender>,
    stop: StopSignal,
}

impl PlanExecutor {
    pub fn new(config: EngineConfig) -> Self {
        PlanExecutor {
            config,
            events: None,
            stop: StopSignal::new(),
        }
    }

    /// Attach an event channel; every status transition is emitted on it.
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Use an externally owned stop signal instead of the internal one.
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// Handle for triggering cooperative cancellation of this executor.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Execute `plan` over `graph`.
    ///
    /// Provisioning failures do not abort the run: the failed node and its
    /// transitive dependents are recorded in the report while independent
    /// branches keep executing. Only infrastructure faults (state store I/O,
    /// task join failures, a plan that does not match the graph) surface as
    /// `Err`.
    pub async fn execute(
        &self,
        plan: &ExecutionPlan,
        graph: &DependencyGraph,
        provisioner: Arc<dyn Provisioner>,
        store: Arc<dyn StateStore>,
    ) -> EngineResult<ExecutionReport> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let mut state = self.init_run_state(plan, graph)?;

        let max_concurrency = if self.config.parallel_enabled {
            self.config.max_concurrency
        } else {
            1
        };

        self.emit(EngineEvent::RunStarted {
            run_id: run_id.clone(),
            direction: plan.direction,
            node_count: plan.len(),
            timestamp: Utc::now(),
        });

        // Seed with nodes that have no plan-direction dependencies, in plan
        // order.
        let mut ready: Vec<String> = plan
            .node_ids
            .iter()
            .filter(|id| state.remaining_deps[id.as_str()] == 0)
            .cloned()
            .collect();

        let mut join_set: JoinSet<TaskOutcome> = JoinSet::new();
        let mut running: HashSet<String> = HashSet::new();
        let mut cancelled = false;

        loop {
            if self.stop.is_triggered() {
                cancelled = true;

                // In-flight actions run to completion; their results still
                // count, but nothing new is dispatched afterwards.
                while let Some(joined) = join_set.join_next().await {
                    let outcome = joined.map_err(|e| {
                        EngineError::Internal(format!("provisioning task join error: {e}"))
                    })?;
                    running.remove(&outcome.node_id);
                    self.record_outcome(outcome, &mut state, graph, plan.direction, &store, None)
                        .await?;
                }

                for id in &plan.node_ids {
                    if state.statuses[id.as_str()] == NodeStatus::Pending {
                        state.statuses.insert(id.clone(), NodeStatus::Skipped);
                        state.skip_reasons.insert(id.clone(), SkipReason::Cancelled);
                        self.emit(EngineEvent::NodeSkipped {
                            node_id: id.clone(),
                            reason: SkipReason::Cancelled,
                            timestamp: Utc::now(),
                        });
                    }
                }

                self.emit(EngineEvent::RunCancelled {
                    run_id: run_id.clone(),
                    timestamp: Utc::now(),
                });
                break;
            }

            while !ready.is_empty() && (max_concurrency == 0 || join_set.len() < max_concurrency) {
                // Lowest plan position first, for reproducible dispatch order.
                let Some(index) = ready
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, id)| state.plan_position[id.as_str()])
                    .map(|(i, _)| i)
                else {
                    break;
                };
                let node_id = ready.remove(index);

                if running.contains(&node_id)
                    || state.statuses[node_id.as_str()] != NodeStatus::Pending
                {
                    continue;
                }

                let node = graph.get_node(&node_id)?.clone();

                let up_to_date = match plan.direction {
                    PlanDirection::Apply => store
                        .get(&node_id)
                        .await?
                        .map(|record| record.is_up_to_date(&node))
                        .unwrap_or(false),
                    // Nothing recorded means nothing to destroy.
                    PlanDirection::Destroy => store.get(&node_id).await?.is_none(),
                };
                if up_to_date {
                    state.statuses.insert(node_id.clone(), NodeStatus::Skipped);
                    state
                        .skip_reasons
                        .insert(node_id.clone(), SkipReason::UpToDate);
                    self.emit(EngineEvent::NodeSkipped {
                        node_id: node_id.clone(),
                        reason: SkipReason::UpToDate,
                        timestamp: Utc::now(),
                    });
                    self.on_satisfied(&node_id, &mut state, graph, plan.direction, &mut ready)?;
                    continue;
                }

                state
                    .statuses
                    .insert(node_id.clone(), NodeStatus::InProgress);
                self.emit(EngineEvent::NodeStarted {
                    node_id: node_id.clone(),
                    timestamp: Utc::now(),
                });

                let provisioner = provisioner.clone();
                let direction = plan.direction;
                let task_node_id = node_id.clone();
                join_set.spawn(async move {
                    let result = match direction {
                        PlanDirection::Apply => provisioner.apply(&node).await.map(Some),
                        PlanDirection::Destroy => provisioner.destroy(&node).await.map(|_| None),
                    };
                    TaskOutcome {
                        node_id: task_node_id,
                        result,
                    }
                });
                running.insert(node_id);
            }

            if join_set.is_empty() {
                if ready.is_empty() {
                    break;
                }
                continue;
            }

            let joined = tokio::select! {
                joined = join_set.join_next() => joined,
                _ = self.stop.cancelled() => continue,
            };

            let Some(joined) = joined else { continue };
            let outcome = joined.map_err(|e| {
                EngineError::Internal(format!("provisioning task join error: {e}"))
            })?;
            running.remove(&outcome.node_id);
            self.record_outcome(
                outcome,
                &mut state,
                graph,
                plan.direction,
                &store,
                Some(&mut ready),
            )
            .await?;
        }

        if !cancelled {
            self.emit(EngineEvent::RunCompleted {
                run_id: run_id.clone(),
                failed_count: state
                    .statuses
                    .values()
                    .filter(|s| **s == NodeStatus::Failed)
                    .count(),
                timestamp: Utc::now(),
            });
        }

        let outcomes = plan
            .node_ids
            .iter()
            .map(|id| NodeOutcome {
                node_id: id.clone(),
                status: state.statuses[id.as_str()],
                skip_reason: state.skip_reasons.get(id.as_str()).copied(),
                error: state.errors.get(id.as_str()).cloned(),
            })
            .collect();

        Ok(ExecutionReport {
            run_id,
            direction: plan.direction,
            cancelled,
            outcomes,
        })
    }

    fn init_run_state(
        &self,
        plan: &ExecutionPlan,
        graph: &DependencyGraph,
    ) -> EngineResult<RunState> {
        if plan.node_ids.len() != graph.len() {
            return Err(EngineError::PlanMismatch(format!(
                "plan lists {} nodes, graph has {}",
                plan.node_ids.len(),
                graph.len()
            )));
        }

        let mut plan_position = HashMap::with_capacity(plan.node_ids.len());
        for (position, id) in plan.node_ids.iter().enumerate() {
            if !graph.contains(id) {
                return Err(EngineError::PlanMismatch(format!(
                    "plan names unknown resource '{id}'"
                )));
            }
            if plan_position.insert(id.clone(), position).is_some() {
                return Err(EngineError::PlanMismatch(format!(
                    "plan lists resource '{id}' twice"
                )));
            }
        }

        let mut statuses = HashMap::with_capacity(plan.node_ids.len());
        let mut remaining_deps = HashMap::with_capacity(plan.node_ids.len());
        for id in &plan.node_ids {
            statuses.insert(id.clone(), NodeStatus::Pending);
            let deps = direction_dependencies(graph, plan.direction, id)?;
            remaining_deps.insert(id.clone(), deps.len());
        }

        Ok(RunState {
            statuses,
            skip_reasons: HashMap::new(),
            errors: HashMap::new(),
            remaining_deps,
            plan_position,
        })
    }

    async fn record_outcome(
        &self,
        outcome: TaskOutcome,
        state: &mut RunState,
        graph: &DependencyGraph,
        direction: PlanDirection,
        store: &Arc<dyn StateStore>,
        ready: Option<&mut Vec<String>>,
    ) -> EngineResult<()> {
        let node_id = outcome.node_id;

        match outcome.result {
            Ok(properties) => {
                match direction {
                    PlanDirection::Apply => {
                        let properties = properties.unwrap_or(Value::Null);
                        store
                            .put(StateRecord::succeeded(node_id.clone(), properties))
                            .await?;
                    }
                    PlanDirection::Destroy => {
                        store.delete(&node_id).await?;
                    }
                }
                state.statuses.insert(node_id.clone(), NodeStatus::Succeeded);
                self.emit(EngineEvent::NodeSucceeded {
                    node_id: node_id.clone(),
                    timestamp: Utc::now(),
                });
                if let Some(ready) = ready {
                    self.on_satisfied(&node_id, state, graph, direction, ready)?;
                }
            }
            Err(error) => {
                tracing::warn!(node_id = %node_id, %error, "provisioning action failed");

                // On apply failure the resource may exist half-configured;
                // record that. On destroy failure the previous record still
                // describes what exists, so it is left untouched.
                if direction == PlanDirection::Apply {
                    let node = graph.get_node(&node_id)?;
                    store
                        .put(StateRecord::failed(node_id.clone(), node.properties.clone()))
                        .await?;
                }

                state.statuses.insert(node_id.clone(), NodeStatus::Failed);
                state
                    .errors
                    .entry(node_id.clone())
                    .or_insert_with(|| error.to_string());
                self.emit(EngineEvent::NodeFailed {
                    node_id: node_id.clone(),
                    error: error.to_string(),
                    timestamp: Utc::now(),
                });
                self.mark_blocked_dependents(&node_id, state, graph, direction)?;
            }
        }

        Ok(())
    }

    /// A node reached a dependent-satisfying terminal status: release any
    /// plan-direction dependents whose last outstanding dependency this was.
    fn on_satisfied(
        &self,
        node_id: &str,
        state: &mut RunState,
        graph: &DependencyGraph,
        direction: PlanDirection,
        ready: &mut Vec<String>,
    ) -> EngineResult<()> {
        for dependent in direction_dependents(graph, direction, node_id)? {
            if state.statuses.get(dependent.as_str()) != Some(&NodeStatus::Pending) {
                continue;
            }
            if let Some(remaining) = state.remaining_deps.get_mut(dependent.as_str()) {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    ready.push(dependent);
                }
            }
        }
        Ok(())
    }

    /// A node failed: every transitive plan-direction dependent that has not
    /// started yet will never run.
    fn mark_blocked_dependents(
        &self,
        node_id: &str,
        state: &mut RunState,
        graph: &DependencyGraph,
        direction: PlanDirection,
    ) -> EngineResult<()> {
        let blocked = match direction {
            PlanDirection::Apply => graph.transitive_dependents_of(node_id)?,
            PlanDirection::Destroy => graph.transitive_dependencies_of(node_id)?,
        };

        for id in blocked {
            if state.statuses.get(id.as_str()) == Some(&NodeStatus::Pending) {
                state.statuses.insert(id.clone(), NodeStatus::Skipped);
                state
                    .skip_reasons
                    .insert(id.clone(), SkipReason::DependencyFailed);
                self.emit(EngineEvent::NodeSkipped {
                    node_id: id,
                    reason: SkipReason::DependencyFailed,
                    timestamp: Utc::now(),
                });
            }
        }
        Ok(())
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }
}

fn direction_dependencies(
    graph: &DependencyGraph,
    direction: PlanDirection,
    node_id: &str,
) -> EngineResult<Vec<String>> {
    let deps = match direction {
        PlanDirection::Apply => graph.dependencies_of(node_id)?,
        PlanDirection::Destroy => graph.dependents_of(node_id)?,
    };
    Ok(deps)
}

fn direction_dependents(
    graph: &DependencyGraph,
    direction: PlanDirection,
    node_id: &str,
) -> EngineResult<Vec<String>> {
    let deps = match direction {
        PlanDirection::Apply => graph.dependents_of(node_id)?,
        PlanDirection::Destroy => graph.dependencies_of(node_id)?,
    };
    Ok(deps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build_graph, ResourceKind, ResourceNode};
    use crate::planner::{plan_apply, plan_destroy};
    use crate::state::MemoryStateStore;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;

    /// Provisioner that records call order and fails on demand.
    #[derive(Default)]
    struct RecordingProvisioner {
        calls: Mutex<Vec<String>>,
        fail: HashSet<String>,
        /// Stop signal to trigger just before returning, keyed by node id.
        trigger_stop_on: Option<(String, StopSignal)>,
    }

    impl RecordingProvisioner {
        fn failing(ids: &[&str]) -> Self {
            RecordingProvisioner {
                fail: ids.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl Provisioner for RecordingProvisioner {
        async fn apply(&self, node: &ResourceNode) -> Result<Value, ProvisionError> {
            self.calls.lock().push(node.id.clone());
            if let Some((id, stop)) = &self.trigger_stop_on {
                if *id == node.id {
                    stop.trigger();
                }
            }
            if self.fail.contains(&node.id) {
                return Err(ProvisionError::ActionFailed(format!(
                    "injected failure for {}",
                    node.id
                )));
            }
            Ok(node.properties.clone())
        }

        async fn destroy(&self, node: &ResourceNode) -> Result<(), ProvisionError> {
            self.calls.lock().push(format!("destroy:{}", node.id));
            if self.fail.contains(&node.id) {
                return Err(ProvisionError::ActionFailed(format!(
                    "injected failure for {}",
                    node.id
                )));
            }
            Ok(())
        }
    }

    fn node(id: &str, deps: &[&str]) -> ResourceNode {
        ResourceNode::new(id, ResourceKind::Other)
            .with_properties(json!({"name": id}))
            .with_dependencies(deps.iter().copied())
    }

    fn serial_executor() -> PlanExecutor {
        PlanExecutor::new(EngineConfig {
            parallel_enabled: false,
            max_concurrency: 0,
        })
    }

    #[tokio::test]
    async fn test_apply_chain_in_order() {
        let graph = build_graph(vec![
            node("net", &[]),
            node("cluster", &["net"]),
            node("svc", &["cluster"]),
        ])
        .unwrap();
        let plan = plan_apply(&graph).unwrap();
        let provisioner = Arc::new(RecordingProvisioner::default());
        let store = Arc::new(MemoryStateStore::new());

        let report = serial_executor()
            .execute(&plan, &graph, provisioner.clone(), store.clone())
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(provisioner.calls(), vec!["net", "cluster", "svc"]);
        assert_eq!(
            store.get("svc").await.unwrap().unwrap().last_status,
            NodeStatus::Succeeded
        );
    }

    #[tokio::test]
    async fn test_failure_skips_transitive_dependents() {
        // a -> b -> c with b failing: a succeeds, b fails, c is skipped.
        let graph = build_graph(vec![
            node("a", &[]),
            node("b", &["a"]),
            node("c", &["b"]),
        ])
        .unwrap();
        let plan = plan_apply(&graph).unwrap();
        let provisioner = Arc::new(RecordingProvisioner::failing(&["b"]));
        let store = Arc::new(MemoryStateStore::new());

        let report = serial_executor()
            .execute(&plan, &graph, provisioner.clone(), store.clone())
            .await
            .unwrap();

        assert_eq!(report.status_of("a"), Some(NodeStatus::Succeeded));
        assert_eq!(report.status_of("b"), Some(NodeStatus::Failed));
        assert_eq!(report.status_of("c"), Some(NodeStatus::Skipped));
        assert_eq!(
            report.skip_reason_of("c"),
            Some(SkipReason::DependencyFailed)
        );
        assert_eq!(report.failed_nodes(), vec!["b"]);
        assert!(report.error_of("b").unwrap().contains("injected failure"));
        // c was never dispatched.
        assert_eq!(provisioner.calls(), vec!["a", "b"]);
        // The failure is persisted for the next run.
        assert_eq!(
            store.get("b").await.unwrap().unwrap().last_status,
            NodeStatus::Failed
        );
    }

    #[tokio::test]
    async fn test_failure_does_not_block_independent_branch() {
        let graph = build_graph(vec![
            node("a", &[]),
            node("b", &["a"]),
            node("x", &[]),
            node("y", &["x"]),
        ])
        .unwrap();
        let plan = plan_apply(&graph).unwrap();
        let provisioner = Arc::new(RecordingProvisioner::failing(&["a"]));
        let store = Arc::new(MemoryStateStore::new());

        let report = serial_executor()
            .execute(&plan, &graph, provisioner, store)
            .await
            .unwrap();

        assert_eq!(report.status_of("a"), Some(NodeStatus::Failed));
        assert_eq!(report.status_of("b"), Some(NodeStatus::Skipped));
        assert_eq!(report.status_of("x"), Some(NodeStatus::Succeeded));
        assert_eq!(report.status_of("y"), Some(NodeStatus::Succeeded));
    }

    #[tokio::test]
    async fn test_reapply_unchanged_skips_everything() {
        let nodes = vec![node("net", &[]), node("cluster", &["net"])];
        let graph = build_graph(nodes).unwrap();
        let plan = plan_apply(&graph).unwrap();
        let store = Arc::new(MemoryStateStore::new());

        let first = Arc::new(RecordingProvisioner::default());
        serial_executor()
            .execute(&plan, &graph, first.clone(), store.clone())
            .await
            .unwrap();
        assert_eq!(first.calls().len(), 2);

        let second = Arc::new(RecordingProvisioner::default());
        let report = serial_executor()
            .execute(&plan, &graph, second.clone(), store)
            .await
            .unwrap();

        assert!(second.calls().is_empty());
        assert_eq!(report.skipped_nodes().len(), 2);
        assert_eq!(report.skip_reason_of("net"), Some(SkipReason::UpToDate));
        assert_eq!(report.skip_reason_of("cluster"), Some(SkipReason::UpToDate));
    }

    #[tokio::test]
    async fn test_reapply_after_property_change_reruns_node() {
        let store = Arc::new(MemoryStateStore::new());

        let graph = build_graph(vec![node("net", &[])]).unwrap();
        let plan = plan_apply(&graph).unwrap();
        serial_executor()
            .execute(
                &plan,
                &graph,
                Arc::new(RecordingProvisioner::default()),
                store.clone(),
            )
            .await
            .unwrap();

        // Same id, different properties.
        let changed = build_graph(vec![ResourceNode::new("net", ResourceKind::Other)
            .with_properties(json!({"name": "net", "cidr": "10.1.0.0/16"}))])
        .unwrap();
        let plan = plan_apply(&changed).unwrap();
        let provisioner = Arc::new(RecordingProvisioner::default());
        let report = serial_executor()
            .execute(&plan, &changed, provisioner.clone(), store)
            .await
            .unwrap();

        assert_eq!(provisioner.calls(), vec!["net"]);
        assert_eq!(report.status_of("net"), Some(NodeStatus::Succeeded));
    }

    #[tokio::test]
    async fn test_cancellation_skips_pending_nodes() {
        // Two independent chains a -> b and x -> y; the stop signal fires
        // while `a` is in flight, so b, x and y must all end Skipped.
        let graph = build_graph(vec![
            node("a", &[]),
            node("b", &["a"]),
            node("x", &[]),
            node("y", &["x"]),
        ])
        .unwrap();
        let plan = plan_apply(&graph).unwrap();

        let stop = StopSignal::new();
        let provisioner = Arc::new(RecordingProvisioner {
            trigger_stop_on: Some(("a".to_string(), stop.clone())),
            ..Default::default()
        });
        let store = Arc::new(MemoryStateStore::new());

        let report = serial_executor()
            .with_stop_signal(stop)
            .execute(&plan, &graph, provisioner.clone(), store)
            .await
            .unwrap();

        assert!(report.cancelled);
        // The in-flight action ran to completion.
        assert_eq!(report.status_of("a"), Some(NodeStatus::Succeeded));
        for id in ["b", "x", "y"] {
            assert_eq!(report.status_of(id), Some(NodeStatus::Skipped), "{id}");
            assert_eq!(report.skip_reason_of(id), Some(SkipReason::Cancelled));
        }
        assert_eq!(provisioner.calls(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_destroy_reverses_and_clears_state() {
        let graph = build_graph(vec![node("net", &[]), node("cluster", &["net"])]).unwrap();
        let store = Arc::new(MemoryStateStore::new());

        let apply = plan_apply(&graph).unwrap();
        serial_executor()
            .execute(
                &apply,
                &graph,
                Arc::new(RecordingProvisioner::default()),
                store.clone(),
            )
            .await
            .unwrap();

        let destroy = plan_destroy(&graph).unwrap();
        let provisioner = Arc::new(RecordingProvisioner::default());
        let report = serial_executor()
            .execute(&destroy, &graph, provisioner.clone(), store.clone())
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(provisioner.calls(), vec!["destroy:cluster", "destroy:net"]);
        assert!(store.get("net").await.unwrap().is_none());
        assert!(store.get("cluster").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_destroy_without_state_skips() {
        let graph = build_graph(vec![node("net", &[])]).unwrap();
        let destroy = plan_destroy(&graph).unwrap();
        let provisioner = Arc::new(RecordingProvisioner::default());

        let report = serial_executor()
            .execute(
                &destroy,
                &graph,
                provisioner.clone(),
                Arc::new(MemoryStateStore::new()),
            )
            .await
            .unwrap();

        assert!(provisioner.calls().is_empty());
        assert_eq!(report.skip_reason_of("net"), Some(SkipReason::UpToDate));
    }

    #[tokio::test]
    async fn test_parallel_execution_completes() {
        let graph = build_graph(vec![
            node("net", &[]),
            node("fs", &["net"]),
            node("cluster", &["net"]),
            node("svc", &["fs", "cluster"]),
        ])
        .unwrap();
        let plan = plan_apply(&graph).unwrap();
        let provisioner = Arc::new(RecordingProvisioner::default());
        let store = Arc::new(MemoryStateStore::new());

        let report = PlanExecutor::new(EngineConfig::default())
            .execute(&plan, &graph, provisioner.clone(), store)
            .await
            .unwrap();

        assert!(report.is_success());
        let calls = provisioner.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls.first().map(String::as_str), Some("net"));
        assert_eq!(calls.last().map(String::as_str), Some("svc"));
    }

    #[tokio::test]
    async fn test_plan_graph_mismatch_rejected() {
        let graph = build_graph(vec![node("net", &[])]).unwrap();
        let bogus = ExecutionPlan {
            direction: PlanDirection::Apply,
            node_ids: vec!["net".to_string(), "ghost".to_string()],
        };

        let err = serial_executor()
            .execute(
                &bogus,
                &graph,
                Arc::new(RecordingProvisioner::default()),
                Arc::new(MemoryStateStore::new()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::PlanMismatch(_)));
    }
}
