//! Cycle repair for raw edge lists.
//!
//! Discovered graph structure arrives as a plain edge list and may contain
//! cycles. [`sanitize_edges`] repairs it: self-loops are dropped outright,
//! then each remaining cycle loses its closing edge until the graph is
//! acyclic. The repair is a best-effort heuristic; every removal is
//! reported and logged so the caller can audit what was cut.

use std::collections::{HashMap, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::{Directed, Direction};
use tracing::warn;

use super::dag::CausalDag;
use crate::errors::GraphError;

/// Result of a sanitization pass.
#[derive(Debug, Clone)]
pub struct SanitizeReport {
    /// The repaired, acyclic graph. Nodes with no surviving edges remain
    /// as isolated variables.
    pub dag: CausalDag,
    /// Edges removed to break cycles, in removal order.
    pub removed_edges: Vec<(String, String)>,
}

impl SanitizeReport {
    /// True when the input was already acyclic.
    pub fn is_clean(&self) -> bool {
        self.removed_edges.is_empty()
    }
}

/// Repair a raw edge list into a DAG.
///
/// Parallel duplicates collapse into one edge. Self-loops are removed
/// first; then, while a directed cycle remains, one cycle is walked and
/// its closing edge removed. Which edge goes is a heuristic choice, but
/// a fixed one: the same input always loses the same edges.
pub fn sanitize_edges<I, S>(edges: I) -> Result<SanitizeReport, GraphError>
where
    I: IntoIterator<Item = (S, S)>,
    S: AsRef<str>,
{
    let mut removed: Vec<(String, String)> = Vec::new();
    let mut graph: StableGraph<String, (), Directed> = StableGraph::new();
    let mut index: HashMap<String, NodeIndex> = HashMap::new();

    let mut ensure = |graph: &mut StableGraph<String, (), Directed>, name: &str| -> NodeIndex {
        if let Some(&idx) = index.get(name) {
            return idx;
        }
        let idx = graph.add_node(name.to_string());
        index.insert(name.to_string(), idx);
        idx
    };

    for (parent, child) in edges {
        let (parent, child) = (parent.as_ref(), child.as_ref());
        if parent == child {
            // A self-loop can never survive; the node itself stays.
            ensure(&mut graph, parent);
            warn!(node = parent, "dropping self-loop during graph sanitization");
            removed.push((parent.to_string(), child.to_string()));
            continue;
        }
        let parent_idx = ensure(&mut graph, parent);
        let child_idx = ensure(&mut graph, child);
        if !graph.contains_edge(parent_idx, child_idx) {
            graph.add_edge(parent_idx, child_idx, ());
        }
    }

    // Break remaining cycles one closing edge at a time.
    loop {
        let sccs: Vec<Vec<NodeIndex>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1)
            .collect();
        let Some(scc) = sccs.into_iter().next() else {
            break;
        };
        let (from, to) = closing_edge(&graph, &scc);
        let parent = graph[from].clone();
        let child = graph[to].clone();
        match graph.find_edge(from, to) {
            Some(edge) => {
                graph.remove_edge(edge);
            }
            // Cannot happen for a strongly connected component; bail
            // rather than loop forever on a graph we cannot repair.
            None => {
                return Err(GraphError::CycleDetected {
                    path: scc.iter().map(|&i| graph[i].as_str()).collect::<Vec<_>>().join(" -> "),
                })
            }
        }
        warn!(
            parent = %parent,
            child = %child,
            "dropping edge to break cycle during graph sanitization"
        );
        removed.push((parent, child));
    }

    let nodes: Vec<String> = graph.node_indices().map(|i| graph[i].clone()).collect();
    let surviving: Vec<(String, String)> = graph
        .edge_indices()
        .filter_map(|e| graph.edge_endpoints(e))
        .map(|(a, b)| (graph[a].clone(), graph[b].clone()))
        .collect();
    let dag = CausalDag::from_parts(nodes.iter(), surviving.iter().map(|(a, b)| (a, b)))?;

    Ok(SanitizeReport {
        dag,
        removed_edges: removed,
    })
}

/// Walk a cycle inside a strongly connected component and return its
/// closing edge: the cycle runs `start -> ... -> tail -> start`, and
/// `(tail, start)` is what gets removed.
fn closing_edge(
    graph: &StableGraph<String, (), Directed>,
    scc: &[NodeIndex],
) -> (NodeIndex, NodeIndex) {
    let members: HashSet<NodeIndex> = scc.iter().copied().collect();
    let start = scc[0];

    // Iterative DFS from `start`, restricted to the component. Strong
    // connectivity guarantees some edge back into `start`.
    let mut stack = vec![start];
    let mut visited = HashSet::new();
    while let Some(node) = stack.pop() {
        if !visited.insert(node) {
            continue;
        }
        for next in graph.neighbors_directed(node, Direction::Outgoing) {
            if next == start {
                return (node, start);
            }
            if members.contains(&next) && !visited.contains(&next) {
                stack.push(next);
            }
        }
    }

    // Unreachable for a real SCC; fall back to cutting the first
    // in-component edge so the loop in the caller still terminates.
    for &node in scc {
        for next in graph.neighbors_directed(node, Direction::Outgoing) {
            if members.contains(&next) {
                return (node, next);
            }
        }
    }
    (start, start)
}
