//! Monte Carlo uplift: the average treatment effect of one intervention
//! over another.

use std::collections::HashMap;

use rand::Rng;
use tracing::debug;

use cascade_core::errors::{CascadeResult, GraphError};
use cascade_scm::ScmModel;

use crate::do_query;
use crate::summary::mean;

/// `E[target | do(treatment)] − E[target | do(control)]`, estimated from
/// `n_samples` fresh draws per arm. The arms share one RNG, so a seeded
/// run is reproducible but the arms are still independent samples.
pub(crate) fn compute<R: Rng + ?Sized>(
    model: &ScmModel,
    control: &HashMap<String, f64>,
    treatment: &HashMap<String, f64>,
    target: &str,
    n_samples: usize,
    rng: &mut R,
) -> CascadeResult<f64> {
    if !model.dag().contains(target) {
        return Err(GraphError::NodeNotFound {
            node: target.to_string(),
        }
        .into());
    }

    let control_run = do_query::run(model, control, n_samples, rng)?;
    let treatment_run = do_query::run(model, treatment, n_samples, rng)?;

    let control_mean = mean(control_run.column(target).unwrap_or(&[]));
    let treatment_mean = mean(treatment_run.column(target).unwrap_or(&[]));
    let uplift = treatment_mean - control_mean;

    debug!(
        node = target,
        control_mean, treatment_mean, uplift, "uplift estimated"
    );
    Ok(uplift)
}
