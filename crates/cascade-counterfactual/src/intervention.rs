//! Step 2: pin the intervened nodes, producing the state that
//! propagation starts from.

use std::collections::{BTreeMap, HashMap};

use cascade_core::dataset::is_missing;
use cascade_core::errors::{CascadeResult, GraphError};
use cascade_scm::ScmModel;

use crate::abduction::standardized_observation;

/// Pre-propagation state in standardized space: the observation with
/// unobserved nodes at the population mean, then every intervened node
/// overwritten with its forced value. Intervening on a node the graph
/// does not know is an error, unlike stray observation keys.
pub(crate) fn initial_state(
    model: &ScmModel,
    observation: &HashMap<String, f64>,
    intervention: &HashMap<String, f64>,
) -> CascadeResult<BTreeMap<String, f64>> {
    let mut state = standardized_observation(model, observation);
    for value in state.values_mut() {
        if is_missing(*value) {
            *value = 0.0;
        }
    }

    for (node, &value) in intervention {
        if !model.dag().contains(node) {
            return Err(GraphError::NodeNotFound { node: node.clone() }.into());
        }
        state.insert(node.clone(), model.stats_for(node).standardize(value));
    }
    Ok(state)
}
