//! Directed acyclic graph of named variables.
//!
//! Acyclicity is a type invariant: every edge insertion re-checks
//! reachability, so a constructed [`CausalDag`] always admits a
//! topological order.

use std::collections::{HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::Dfs;
use petgraph::{Directed, Direction};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::GraphError;

/// The underlying directed graph type. Node weights are variable names;
/// edges carry no weight.
pub type VariableGraph = StableGraph<String, (), Directed>;

/// A causal DAG with O(1) name lookup.
#[derive(Debug, Clone, Default)]
pub struct CausalDag {
    graph: VariableGraph,
    node_index: HashMap<String, NodeIndex>,
}

/// Serialized form: explicit node and edge lists. Deserialization
/// re-validates acyclicity, so a tampered artifact cannot smuggle a
/// cycle past the type invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DagParts {
    nodes: Vec<String>,
    edges: Vec<(String, String)>,
}

impl CausalDag {
    /// Create an empty DAG.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a DAG from `(parent, child)` edges. Node set is the union of
    /// all endpoints, in first-mention order.
    pub fn from_edges<I, S>(edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        let mut dag = Self::new();
        for (parent, child) in edges {
            dag.add_edge(parent.as_ref(), child.as_ref())?;
        }
        Ok(dag)
    }

    /// Build a DAG from an explicit node list plus edges. Nodes that appear
    /// in no edge stay as isolated variables.
    pub fn from_parts<N, E, S, T>(nodes: N, edges: E) -> Result<Self, GraphError>
    where
        N: IntoIterator<Item = S>,
        E: IntoIterator<Item = (T, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut dag = Self::new();
        for node in nodes {
            dag.ensure_node(node.as_ref());
        }
        for (parent, child) in edges {
            dag.add_edge(parent.as_ref(), child.as_ref())?;
        }
        Ok(dag)
    }

    /// Get or create the node for a variable name.
    pub fn ensure_node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.node_index.insert(name.to_string(), idx);
        idx
    }

    /// Insert a `parent → child` edge, creating missing nodes. Rejects
    /// self-loops and any edge that would close a cycle.
    pub fn add_edge(&mut self, parent: &str, child: &str) -> Result<(), GraphError> {
        if parent == child {
            return Err(GraphError::CycleDetected {
                path: format!("{parent} -> {child}"),
            });
        }
        let parent_idx = self.ensure_node(parent);
        let child_idx = self.ensure_node(child);

        // If child already reaches parent, adding parent→child closes a cycle.
        if let Some(path) = self.path_between(child_idx, parent_idx) {
            let mut names: Vec<&str> = path.iter().map(|&i| self.graph[i].as_str()).collect();
            names.push(child);
            return Err(GraphError::CycleDetected {
                path: names.join(" -> "),
            });
        }

        // Parallel edges add nothing to the parent set.
        if !self.graph.contains_edge(parent_idx, child_idx) {
            self.graph.add_edge(parent_idx, child_idx, ());
        }
        Ok(())
    }

    /// DFS path from `from` to `to`, if one exists.
    fn path_between(&self, from: NodeIndex, to: NodeIndex) -> Option<Vec<NodeIndex>> {
        let mut predecessor: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut dfs = Dfs::new(&self.graph, from);
        while let Some(node) = dfs.next(&self.graph) {
            for next in self.graph.neighbors_directed(node, Direction::Outgoing) {
                predecessor.entry(next).or_insert(node);
            }
            if node == to {
                let mut path = vec![to];
                let mut current = to;
                while current != from {
                    current = *predecessor.get(&current)?;
                    path.push(current);
                }
                path.reverse();
                return Some(path);
            }
        }
        None
    }

    pub fn contains(&self, name: &str) -> bool {
        self.node_index.contains_key(name)
    }

    /// Parent names of a node, in edge insertion order.
    pub fn parents(&self, name: &str) -> Result<Vec<String>, GraphError> {
        let idx = self.index_of(name)?;
        let mut parents: Vec<String> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|i| self.graph[i].clone())
            .collect();
        // petgraph yields incoming neighbors newest-first.
        parents.reverse();
        Ok(parents)
    }

    /// Child names of a node.
    pub fn children(&self, name: &str) -> Result<Vec<String>, GraphError> {
        let idx = self.index_of(name)?;
        let mut children: Vec<String> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|i| self.graph[i].clone())
            .collect();
        children.reverse();
        Ok(children)
    }

    /// True when the node has no parents. Isolated nodes are roots.
    pub fn is_root(&self, name: &str) -> Result<bool, GraphError> {
        let idx = self.index_of(name)?;
        Ok(self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .next()
            .is_none())
    }

    /// All parentless nodes, in insertion order.
    pub fn roots(&self) -> Vec<String> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    /// Every node reachable from `name` by directed edges, excluding
    /// `name` itself.
    pub fn descendants(&self, name: &str) -> Result<HashSet<String>, GraphError> {
        let idx = self.index_of(name)?;
        let mut result = HashSet::new();
        let mut dfs = Dfs::new(&self.graph, idx);
        while let Some(node) = dfs.next(&self.graph) {
            if node != idx {
                result.insert(self.graph[node].clone());
            }
        }
        Ok(result)
    }

    /// All node names, in insertion order.
    pub fn node_names(&self) -> Vec<String> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].clone())
            .collect()
    }

    /// All edges as `(parent, child)` name pairs.
    pub fn edges(&self) -> Vec<(String, String)> {
        self.graph
            .edge_indices()
            .filter_map(|e| self.graph.edge_endpoints(e))
            .map(|(a, b)| (self.graph[a].clone(), self.graph[b].clone()))
            .collect()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Topological order of all nodes. Parents always precede children;
    /// the insertion-cycle check makes failure impossible for any DAG
    /// built through this API.
    pub fn topo_order(&self) -> Result<Vec<String>, GraphError> {
        let order = toposort(&self.graph, None).map_err(|cycle| GraphError::CycleDetected {
            path: self.graph[cycle.node_id()].clone(),
        })?;
        Ok(order.into_iter().map(|idx| self.graph[idx].clone()).collect())
    }

    fn index_of(&self, name: &str) -> Result<NodeIndex, GraphError> {
        self.node_index
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::NodeNotFound {
                node: name.to_string(),
            })
    }
}

impl Serialize for CausalDag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        DagParts {
            nodes: self.node_names(),
            edges: self.edges(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CausalDag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parts = DagParts::deserialize(deserializer)?;
        CausalDag::from_parts(parts.nodes.iter(), parts.edges.iter().map(|(a, b)| (a, b)))
            .map_err(D::Error::custom)
    }
}
