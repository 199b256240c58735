//! Step 3: replay the mechanisms in topological order with the unit's
//! abducted noise.

use std::collections::{BTreeMap, HashMap};

use cascade_core::errors::CascadeResult;
use cascade_scm::ScmModel;

/// Recompute every non-intervened node with parents as
/// `f(parents) + noise`, visiting parents before children so each node
/// sees its parents' counterfactual values. Intervened nodes and
/// parentless nodes keep their initial-state values.
pub(crate) fn propagate(
    model: &ScmModel,
    state: &mut BTreeMap<String, f64>,
    noise: &BTreeMap<String, f64>,
    intervention: &HashMap<String, f64>,
) -> CascadeResult<()> {
    for node in model.dag().topo_order()? {
        if intervention.contains_key(&node) {
            continue;
        }
        let parents = model.dag().parents(&node)?;
        if parents.is_empty() {
            continue;
        }
        let parent_values: Vec<f64> = parents.iter().map(|p| state[p.as_str()]).collect();
        let structural = model.structural_value(&node, &parent_values).unwrap_or(0.0);
        state.insert(node.clone(), structural + noise[node.as_str()]);
    }
    Ok(())
}
