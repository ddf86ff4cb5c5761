use std::collections::HashMap;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};

use crate::error::{GraphError, GraphResult};

use super::traversal::find_cycle;
use super::types::{DependencyEdge, ResourceNode};

/// The validated DAG of all resource nodes for one deployment.
///
/// Edges run dependency → dependent. Nodes keep the order in which they were
/// inserted (their discovery index); the planner uses it to break ties so
/// that plans are reproducible across runs on an unchanged descriptor set.
#[derive(Debug)]
pub struct DependencyGraph {
    graph: StableDiGraph<ResourceNode, DependencyEdge>,
    index: HashMap<String, NodeIndex>,
    discovery_order: Vec<NodeIndex>,
}

impl DependencyGraph {
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.index.contains_key(node_id)
    }

    /// Resource descriptor for the given id.
    pub fn get_node(&self, node_id: &str) -> GraphResult<&ResourceNode> {
        let idx = self.node_index(node_id)?;
        self.graph
            .node_weight(idx)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))
    }

    /// All node ids in discovery order.
    pub fn node_ids(&self) -> Vec<String> {
        self.discovery_order
            .iter()
            .filter_map(|&idx| self.graph.node_weight(idx).map(|n| n.id.clone()))
            .collect()
    }

    /// Position at which the node was inserted.
    pub fn discovery_index(&self, node_id: &str) -> GraphResult<usize> {
        let idx = self.node_index(node_id)?;
        self.discovery_order
            .iter()
            .position(|&i| i == idx)
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))
    }

    /// Direct dependencies (incoming edges) of a node.
    pub fn dependencies_of(&self, node_id: &str) -> GraphResult<Vec<String>> {
        self.neighbor_ids(node_id, petgraph::Direction::Incoming)
    }

    /// Direct dependents (outgoing edges) of a node.
    pub fn dependents_of(&self, node_id: &str) -> GraphResult<Vec<String>> {
        self.neighbor_ids(node_id, petgraph::Direction::Outgoing)
    }

    /// Every node that transitively depends on `node_id`.
    pub fn transitive_dependents_of(&self, node_id: &str) -> GraphResult<Vec<String>> {
        let idx = self.node_index(node_id)?;
        Ok(super::traversal::transitive_dependents(&self.graph, idx)
            .into_iter()
            .filter_map(|i| self.graph.node_weight(i).map(|n| n.id.clone()))
            .collect())
    }

    /// Every node that `node_id` transitively depends on.
    pub fn transitive_dependencies_of(&self, node_id: &str) -> GraphResult<Vec<String>> {
        let idx = self.node_index(node_id)?;
        Ok(super::traversal::transitive_dependencies(&self.graph, idx)
            .into_iter()
            .filter_map(|i| self.graph.node_weight(i).map(|n| n.id.clone()))
            .collect())
    }

    fn node_index(&self, node_id: &str) -> GraphResult<NodeIndex> {
        self.index
            .get(node_id)
            .copied()
            .ok_or_else(|| GraphError::NodeNotFound(node_id.to_string()))
    }

    fn neighbor_ids(
        &self,
        node_id: &str,
        direction: petgraph::Direction,
    ) -> GraphResult<Vec<String>> {
        let idx = self.node_index(node_id)?;
        Ok(self
            .graph
            .neighbors_directed(idx, direction)
            .filter_map(|i| self.graph.node_weight(i).map(|n| n.id.clone()))
            .collect())
    }
}

/// Build a validated dependency graph from resource descriptors.
///
/// Nodes are inserted in input order. Fails with
/// [`GraphError::DuplicateNode`] on repeated ids,
/// [`GraphError::UnresolvedReference`] when a `depends_on` id names no node
/// in the input, and [`GraphError::CycleDetected`] (with the offending path)
/// when the references do not form a DAG.
pub fn build_graph(nodes: Vec<ResourceNode>) -> GraphResult<DependencyGraph> {
    let mut graph = StableDiGraph::<ResourceNode, DependencyEdge>::new();
    let mut index: HashMap<String, NodeIndex> = HashMap::new();
    let mut discovery_order: Vec<NodeIndex> = Vec::with_capacity(nodes.len());

    for node in nodes {
        if index.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        let id = node.id.clone();
        let idx = graph.add_node(node);
        index.insert(id, idx);
        discovery_order.push(idx);
    }

    for &idx in &discovery_order {
        let (node_id, depends_on) = {
            let node = graph
                .node_weight(idx)
                .ok_or_else(|| GraphError::NodeNotFound(format!("{:?}", idx)))?;
            (node.id.clone(), node.depends_on.clone())
        };

        for reference in depends_on {
            let dep_idx = index.get(&reference).copied().ok_or_else(|| {
                GraphError::UnresolvedReference {
                    node_id: node_id.clone(),
                    reference: reference.clone(),
                }
            })?;
            graph.add_edge(
                dep_idx,
                idx,
                DependencyEdge {
                    dependency: reference,
                    dependent: node_id.clone(),
                },
            );
        }
    }

    if let Some(path) = find_cycle(&graph, &discovery_order) {
        return Err(GraphError::CycleDetected { path });
    }

    Ok(DependencyGraph {
        graph,
        index,
        discovery_order,
    })
}
