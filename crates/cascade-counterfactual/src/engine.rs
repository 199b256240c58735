//! Counterfactual queries against a fitted model.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use cascade_core::errors::{CascadeResult, ModelError};
use cascade_scm::ScmModel;

use crate::{abduction, intervention, propagation};

/// Result of one counterfactual query.
#[derive(Debug, Clone, Serialize)]
pub struct CounterfactualOutcome {
    /// Counterfactual value of every variable, in raw units.
    pub values: BTreeMap<String, f64>,
    /// The abducted per-node noise in standardized space, exposed for
    /// diagnostics: large magnitudes flag units the model explains badly.
    pub noise: BTreeMap<String, f64>,
}

/// Deterministic single-unit counterfactual engine.
///
/// Wraps a shared fitted model and never mutates it, so one engine can
/// serve any number of concurrent queries. Construction is the only
/// place fitness is checked; queries after that cannot hit `NotFitted`.
#[derive(Debug)]
pub struct CounterfactualEngine {
    model: Arc<ScmModel>,
}

impl CounterfactualEngine {
    /// Wrap a fitted model; rejects unfitted ones up front.
    pub fn new(model: Arc<ScmModel>) -> CascadeResult<Self> {
        if !model.is_fitted() {
            return Err(ModelError::NotFitted {
                operation: "counterfactual estimation".to_string(),
            }
            .into());
        }
        Ok(Self { model })
    }

    /// Step 1 on its own: the latent noise this observation implies.
    ///
    /// Unobserved nodes get zero noise, the average case; observation
    /// keys that are not graph nodes are ignored.
    pub fn abduct_noise(
        &self,
        observation: &HashMap<String, f64>,
    ) -> CascadeResult<BTreeMap<String, f64>> {
        abduction::abduct(&self.model, observation)
    }

    /// Answer "what would this unit's variables have been, had
    /// `intervention` held?" given what was actually observed.
    ///
    /// Runs abduction, action, and prediction in order, then maps the
    /// standardized result back to raw units. The intervened nodes come
    /// back at exactly their forced values; everything upstream of them
    /// keeps its abducted state.
    pub fn estimate_counterfactual(
        &self,
        observation: &HashMap<String, f64>,
        intervention: &HashMap<String, f64>,
    ) -> CascadeResult<CounterfactualOutcome> {
        // Abduction: recover this unit's noise from the observation.
        let noise = abduction::abduct(&self.model, observation)?;

        // Action: pin the intervened nodes in the standardized state.
        let mut state = intervention::initial_state(&self.model, observation, intervention)?;

        // Prediction: replay mechanisms plus noise, parents first.
        propagation::propagate(&self.model, &mut state, &noise, intervention)?;

        let values: BTreeMap<String, f64> = state
            .into_iter()
            .map(|(node, z)| {
                let raw = self.model.stats_for(&node).destandardize(z);
                (node, raw)
            })
            .collect();

        debug!(
            observed = observation.len(),
            intervened = intervention.len(),
            "counterfactual estimated"
        );

        Ok(CounterfactualOutcome { values, noise })
    }

    /// The model this engine reads from.
    pub fn model(&self) -> &ScmModel {
        &self.model
    }
}
