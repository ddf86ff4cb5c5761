//! Topological planner: turns a [`DependencyGraph`] into a concrete,
//! deterministic execution order.
//!
//! Apply plans list every dependency before its dependents; destroy plans
//! are the exact reverse of the apply plan they mirror, so destroy undoes
//! apply in symmetric order.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};
use crate::graph::DependencyGraph;

/// Direction a plan executes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanDirection {
    Apply,
    Destroy,
}

/// An ordered sequence of node ids to provision or destroy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub direction: PlanDirection,
    pub node_ids: Vec<String>,
}

impl ExecutionPlan {
    pub fn len(&self) -> usize {
        self.node_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_ids.is_empty()
    }
}

/// Plan an apply: a topological order of the graph.
///
/// Among nodes whose dependencies are all satisfied, the one with the lowest
/// discovery index goes first. This makes the plan a deterministic function
/// of the descriptor input order.
pub fn plan_apply(graph: &DependencyGraph) -> GraphResult<ExecutionPlan> {
    let ids = graph.node_ids();

    let mut indegree: HashMap<String, usize> = HashMap::with_capacity(ids.len());
    for id in &ids {
        indegree.insert(id.clone(), graph.dependencies_of(id)?.len());
    }

    // Min-heap keyed by discovery index.
    let mut ready: BinaryHeap<Reverse<(usize, String)>> = BinaryHeap::new();
    for id in &ids {
        if indegree[id] == 0 {
            ready.push(Reverse((graph.discovery_index(id)?, id.clone())));
        }
    }

    let mut ordered = Vec::with_capacity(ids.len());
    while let Some(Reverse((_, id))) = ready.pop() {
        for dependent in graph.dependents_of(&id)? {
            let remaining = indegree
                .get_mut(&dependent)
                .ok_or_else(|| GraphError::NodeNotFound(dependent.clone()))?;
            *remaining -= 1;
            if *remaining == 0 {
                ready.push(Reverse((graph.discovery_index(&dependent)?, dependent)));
            }
        }
        ordered.push(id);
    }

    // build_graph already rejected cycles; a shortfall here means the graph
    // and planner disagree.
    if ordered.len() != ids.len() {
        let stuck: Vec<String> = ids
            .into_iter()
            .filter(|id| !ordered.contains(id))
            .collect();
        return Err(GraphError::CycleDetected { path: stuck });
    }

    Ok(ExecutionPlan {
        direction: PlanDirection::Apply,
        node_ids: ordered,
    })
}

/// Plan a destroy: the exact reverse of [`plan_apply`] for the same graph.
pub fn plan_destroy(graph: &DependencyGraph) -> GraphResult<ExecutionPlan> {
    let mut plan = plan_apply(graph)?;
    plan.node_ids.reverse();
    plan.direction = PlanDirection::Destroy;
    Ok(plan)
}
