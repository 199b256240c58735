//! Step 1 of the counterfactual procedure: recover the unit's latent
//! noise from a single observation, holding the mechanisms fixed.

use std::collections::{BTreeMap, HashMap};

use cascade_core::dataset::is_missing;
use cascade_core::errors::CascadeResult;
use cascade_scm::ScmModel;

/// Standardized view of an observation over every DAG node. Unobserved
/// nodes come back as NaN so callers can tell "missing" from "zero".
/// Observation keys that name no DAG node are ignored.
pub(crate) fn standardized_observation(
    model: &ScmModel,
    observation: &HashMap<String, f64>,
) -> BTreeMap<String, f64> {
    model
        .dag()
        .node_names()
        .into_iter()
        .map(|node| {
            let value = match observation.get(&node) {
                Some(&v) => model.stats_for(&node).standardize(v),
                None => f64::NAN,
            };
            (node, value)
        })
        .collect()
}

/// Infer per-node noise from `observation`.
///
/// Each node's structural prediction is computed from its *observed*
/// parent values only (unobserved parents enter at the standardized
/// mean). Observed nodes get `observed − predicted`; unobserved nodes
/// get zero, the average case. A NaN observation value counts as
/// unobserved.
pub(crate) fn abduct(
    model: &ScmModel,
    observation: &HashMap<String, f64>,
) -> CascadeResult<BTreeMap<String, f64>> {
    let observed = standardized_observation(model, observation);

    // Visit order is irrelevant: predictions consume observed values
    // only, never noise computed for other nodes.
    let mut noise = BTreeMap::new();
    for node in model.dag().node_names() {
        let parents = model.dag().parents(&node)?;
        let structural = if parents.is_empty() {
            0.0
        } else {
            let parent_values: Vec<f64> = parents
                .iter()
                .map(|p| {
                    let z = observed[p.as_str()];
                    if is_missing(z) {
                        0.0
                    } else {
                        z
                    }
                })
                .collect();
            model.structural_value(&node, &parent_values).unwrap_or(0.0)
        };

        let z = observed[node.as_str()];
        let u = if is_missing(z) { 0.0 } else { z - structural };
        noise.insert(node, u);
    }
    Ok(noise)
}
