//! Forward sampling under an intervention.

use std::collections::{BTreeMap, HashMap};

use rand::Rng;
use rand_distr::StandardNormal;

use cascade_core::dataset::Dataset;
use cascade_core::errors::{CascadeResult, GraphError};
use cascade_scm::{NodeModel, ScmModel};

/// Draw `n_samples` fresh units from the interventional distribution
/// `P(V | do(interventions))`.
///
/// Intervened nodes become constant columns. Every other node draws one
/// standard-normal noise term per sample: roots are pure noise, non-roots
/// add theirs to the structural value of the already-sampled parents.
/// Nothing is reused from any observation, which is what separates a
/// do-query from a counterfactual.
pub(crate) fn run<R: Rng + ?Sized>(
    model: &ScmModel,
    interventions: &HashMap<String, f64>,
    n_samples: usize,
    rng: &mut R,
) -> CascadeResult<Dataset> {
    // Standardize the forced values up front; unknown nodes fail fast.
    let mut forced: HashMap<&str, f64> = HashMap::with_capacity(interventions.len());
    for (node, &value) in interventions {
        if !model.dag().contains(node) {
            return Err(GraphError::NodeNotFound { node: node.clone() }.into());
        }
        forced.insert(node.as_str(), model.stats_for(node).standardize(value));
    }

    let mut columns: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for node in model.dag().topo_order()? {
        let column = if let Some(&z) = forced.get(node.as_str()) {
            vec![z; n_samples]
        } else {
            let parents = model.dag().parents(&node)?;
            let structural: Vec<f64> = match model.node_model(&node) {
                Some(NodeModel::Fitted(function)) if !parents.is_empty() => {
                    let parent_columns: Vec<&[f64]> = parents
                        .iter()
                        .map(|p| columns[p.as_str()].as_slice())
                        .collect();
                    function.forward_columns(&parent_columns)
                }
                // Roots and marginal nodes have no structural part.
                _ => vec![0.0; n_samples],
            };
            structural
                .into_iter()
                .map(|v| v + rng.sample::<f64, _>(StandardNormal))
                .collect()
        };
        columns.insert(node, column);
    }

    let mut data = Dataset::new();
    for (node, column) in columns {
        let stats = model.stats_for(&node);
        let raw: Vec<f64> = column.into_iter().map(|z| stats.destandardize(z)).collect();
        data.insert_column(node, raw)?;
    }
    Ok(data)
}
