//! Property tests for counterfactual estimation over randomly weighted
//! linear chains.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use proptest::prelude::*;

use cascade_core::graph::CausalDag;
use cascade_counterfactual::CounterfactualEngine;
use cascade_scm::{NodeStats, ScmModel, StructuralFunction};

const NODES: [&str; 4] = ["X0", "X1", "X2", "X3"];

/// Exact single-input linear map via paired ReLUs.
fn linear_function(slope: f64) -> StructuralFunction {
    StructuralFunction::from_weights(
        vec![vec![1.0], vec![-1.0]],
        vec![0.0, 0.0],
        vec![slope, -slope],
        0.0,
    )
    .expect("well-formed linear weights")
}

/// Chain X0 → X1 → X2 → X3 with the given standardized slopes and stats.
fn chain_model(slopes: [f64; 3], means: [f64; 4], stds: [f64; 4]) -> Arc<ScmModel> {
    let dag = CausalDag::from_edges([("X0", "X1"), ("X1", "X2"), ("X2", "X3")])
        .expect("chain is acyclic");
    let mut stats = BTreeMap::new();
    for (node, (&mean, &std)) in NODES.iter().zip(means.iter().zip(&stds)) {
        stats.insert(node.to_string(), NodeStats { mean, std });
    }
    let mut functions = BTreeMap::new();
    for (node, &slope) in NODES.iter().skip(1).zip(&slopes) {
        functions.insert(node.to_string(), linear_function(slope));
    }
    Arc::new(ScmModel::from_functions(dag, stats, functions).expect("chain model assembles"))
}

fn observation(values: [f64; 4]) -> HashMap<String, f64> {
    NODES
        .iter()
        .zip(values)
        .map(|(node, value)| (node.to_string(), value))
        .collect()
}

prop_compose! {
    fn chain_inputs()(
        slopes in prop::array::uniform3(-2.0..2.0f64),
        means in prop::array::uniform4(-10.0..10.0f64),
        stds in prop::array::uniform4(0.5..3.0f64),
        observed in prop::array::uniform4(-20.0..20.0f64),
        forced in -20.0..20.0f64,
    ) -> ([f64; 3], [f64; 4], [f64; 4], [f64; 4], f64) {
        (slopes, means, stds, observed, forced)
    }
}

// =============================================================================
// Property: the intervened node always lands on its forced value
// =============================================================================
proptest! {
    #[test]
    fn intervened_node_is_exact((slopes, means, stds, observed, forced) in chain_inputs()) {
        let engine = CounterfactualEngine::new(chain_model(slopes, means, stds)).unwrap();
        for node in NODES {
            let outcome = engine
                .estimate_counterfactual(
                    &observation(observed),
                    &HashMap::from([(node.to_string(), forced)]),
                )
                .unwrap();
            let got = outcome.values[node];
            let tolerance = 1e-9 * (1.0 + forced.abs());
            prop_assert!(
                (got - forced).abs() < tolerance,
                "{} came back {}, forced {}",
                node, got, forced
            );
        }
    }
}

// =============================================================================
// Property: nodes outside the intervention's descendant set never move
// =============================================================================
proptest! {
    #[test]
    fn non_descendants_are_untouched((slopes, means, stds, observed, forced) in chain_inputs()) {
        let engine = CounterfactualEngine::new(chain_model(slopes, means, stds)).unwrap();
        let baseline = engine
            .estimate_counterfactual(&observation(observed), &HashMap::new())
            .unwrap();
        let intervened = engine
            .estimate_counterfactual(
                &observation(observed),
                &HashMap::from([("X2".to_string(), forced)]),
            )
            .unwrap();

        // X0 and X1 are upstream of X2: identical arithmetic, so bitwise
        // equality is expected, not just closeness.
        prop_assert_eq!(baseline.values["X0"], intervened.values["X0"]);
        prop_assert_eq!(baseline.values["X1"], intervened.values["X1"]);
    }
}

// =============================================================================
// Property: full observation plus empty intervention is a fixed point
// =============================================================================
proptest! {
    #[test]
    fn full_observation_is_reproduced((slopes, means, stds, observed, _f) in chain_inputs()) {
        let engine = CounterfactualEngine::new(chain_model(slopes, means, stds)).unwrap();
        let outcome = engine
            .estimate_counterfactual(&observation(observed), &HashMap::new())
            .unwrap();
        for (node, raw) in NODES.iter().zip(observed) {
            let got = outcome.values[*node];
            let tolerance = 1e-9 * (1.0 + raw.abs());
            prop_assert!(
                (got - raw).abs() < tolerance,
                "{} drifted from {} to {}",
                node, raw, got
            );
        }
    }
}

// =============================================================================
// Property: estimation is deterministic
// =============================================================================
proptest! {
    #[test]
    fn estimation_is_deterministic((slopes, means, stds, observed, forced) in chain_inputs()) {
        let engine = CounterfactualEngine::new(chain_model(slopes, means, stds)).unwrap();
        let forced_map = HashMap::from([("X1".to_string(), forced)]);
        let a = engine.estimate_counterfactual(&observation(observed), &forced_map).unwrap();
        let b = engine.estimate_counterfactual(&observation(observed), &forced_map).unwrap();
        prop_assert_eq!(a.values, b.values);
        prop_assert_eq!(a.noise, b.noise);
    }
}
