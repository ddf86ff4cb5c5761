use std::collections::HashMap;
use std::collections::HashSet;

use petgraph::stable_graph::{NodeIndex, StableDiGraph};

use super::types::{DependencyEdge, ResourceNode};

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Find a cycle via depth-first traversal with three-color marking.
///
/// Returns the cycle as a closed id path (first id repeated at the end), or
/// `None` for acyclic graphs. Roots are visited in the order given so the
/// reported cycle is deterministic for a fixed insertion order.
pub fn find_cycle(
    graph: &StableDiGraph<ResourceNode, DependencyEdge>,
    roots: &[NodeIndex],
) -> Option<Vec<String>> {
    let mut marks: HashMap<NodeIndex, Mark> = HashMap::new();
    let mut stack: Vec<NodeIndex> = Vec::new();

    for &root in roots {
        if marks.get(&root).copied().unwrap_or(Mark::Unvisited) == Mark::Unvisited {
            if let Some(cycle) = visit(graph, root, &mut marks, &mut stack) {
                return Some(cycle);
            }
        }
    }

    None
}

fn visit(
    graph: &StableDiGraph<ResourceNode, DependencyEdge>,
    idx: NodeIndex,
    marks: &mut HashMap<NodeIndex, Mark>,
    stack: &mut Vec<NodeIndex>,
) -> Option<Vec<String>> {
    marks.insert(idx, Mark::InProgress);
    stack.push(idx);

    for next in graph.neighbors_directed(idx, petgraph::Direction::Outgoing) {
        match marks.get(&next).copied().unwrap_or(Mark::Unvisited) {
            Mark::InProgress => {
                // Close the loop: slice the stack from the first occurrence
                // of the revisited node.
                let start = stack
                    .iter()
                    .position(|&i| i == next)
                    .unwrap_or(stack.len() - 1);
                let mut path: Vec<String> = stack[start..]
                    .iter()
                    .filter_map(|&i| graph.node_weight(i).map(|n| n.id.clone()))
                    .collect();
                if let Some(first) = path.first().cloned() {
                    path.push(first);
                }
                return Some(path);
            }
            Mark::Unvisited => {
                if let Some(cycle) = visit(graph, next, marks, stack) {
                    return Some(cycle);
                }
            }
            Mark::Done => {}
        }
    }

    stack.pop();
    marks.insert(idx, Mark::Done);
    None
}

/// All nodes reachable from `start` along outgoing edges, excluding `start`.
pub fn transitive_dependents(
    graph: &StableDiGraph<ResourceNode, DependencyEdge>,
    start: NodeIndex,
) -> Vec<NodeIndex> {
    reachable(graph, start, petgraph::Direction::Outgoing)
}

/// All nodes reachable from `start` along incoming edges, excluding `start`.
pub fn transitive_dependencies(
    graph: &StableDiGraph<ResourceNode, DependencyEdge>,
    start: NodeIndex,
) -> Vec<NodeIndex> {
    reachable(graph, start, petgraph::Direction::Incoming)
}

fn reachable(
    graph: &StableDiGraph<ResourceNode, DependencyEdge>,
    start: NodeIndex,
    direction: petgraph::Direction,
) -> Vec<NodeIndex> {
    let mut seen: HashSet<NodeIndex> = HashSet::new();
    let mut queue: Vec<NodeIndex> = graph.neighbors_directed(start, direction).collect();
    let mut out = Vec::new();

    while let Some(idx) = queue.pop() {
        if idx == start || !seen.insert(idx) {
            continue;
        }
        out.push(idx);
        queue.extend(graph.neighbors_directed(idx, direction));
    }

    out
}
