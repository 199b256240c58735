//! Property tests for DAG construction and sanitization.

use proptest::prelude::*;

use cascade_core::graph::{sanitize_edges, CausalDag};

/// Random edge lists over a small node universe. Cycles are likely.
fn edge_strategy(n_nodes: usize, max_edges: usize) -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0..n_nodes, 0..n_nodes), 0..max_edges)
}

fn named(edges: &[(usize, usize)]) -> Vec<(String, String)> {
    edges
        .iter()
        .map(|&(a, b)| (format!("n{a}"), format!("n{b}")))
        .collect()
}

// =============================================================================
// Property: incremental construction never admits a cycle
// =============================================================================
proptest! {
    #[test]
    fn incremental_construction_stays_acyclic(edges in edge_strategy(12, 40)) {
        let mut dag = CausalDag::new();
        for (parent, child) in named(&edges) {
            // Rejected edges are fine; accepted ones must keep the DAG sound.
            let _ = dag.add_edge(&parent, &child);
        }
        let order = dag.topo_order();
        prop_assert!(order.is_ok(), "constructed graph lost acyclicity");
        prop_assert_eq!(order.unwrap().len(), dag.node_count());
    }
}

// =============================================================================
// Property: sanitization always yields a DAG and never invents edges
// =============================================================================
proptest! {
    #[test]
    fn sanitize_always_yields_dag(edges in edge_strategy(10, 30)) {
        let input = named(&edges);
        let report = sanitize_edges(input.clone()).unwrap();

        prop_assert!(report.dag.topo_order().is_ok());

        // Every surviving edge appeared in the input.
        for (parent, child) in report.dag.edges() {
            prop_assert!(
                input.contains(&(parent.clone(), child.clone())),
                "sanitizer invented edge {parent} -> {child}"
            );
        }
        // Every removed edge appeared in the input too.
        for (parent, child) in &report.removed_edges {
            prop_assert!(input.contains(&(parent.clone(), child.clone())));
        }
    }
}

// =============================================================================
// Property: every kept edge respects the topological order
// =============================================================================
proptest! {
    #[test]
    fn topo_order_respects_every_edge(edges in edge_strategy(10, 30)) {
        let report = sanitize_edges(named(&edges)).unwrap();
        let order = report.dag.topo_order().unwrap();
        for (parent, child) in report.dag.edges() {
            let p = order.iter().position(|n| *n == parent).unwrap();
            let c = order.iter().position(|n| *n == child).unwrap();
            prop_assert!(p < c, "{} must precede {}", parent, child);
        }
    }
}

// =============================================================================
// Property: sanitization of an already-acyclic list removes nothing
// =============================================================================
proptest! {
    #[test]
    fn sanitize_preserves_acyclic_input(edges in edge_strategy(12, 30)) {
        // Forward-only edges cannot form a cycle.
        let forward: Vec<(String, String)> = edges
            .iter()
            .filter(|(a, b)| a < b)
            .map(|&(a, b)| (format!("n{a}"), format!("n{b}")))
            .collect();
        let report = sanitize_edges(forward.clone()).unwrap();
        prop_assert!(report.is_clean());

        let mut unique: Vec<_> = forward;
        unique.sort();
        unique.dedup();
        prop_assert_eq!(report.dag.edge_count(), unique.len());
    }
}
