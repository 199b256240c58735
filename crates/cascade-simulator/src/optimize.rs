//! Grid search for the intervention value that steers a target node
//! toward a desired mean.

use std::collections::HashMap;

use rand::Rng;
use serde::Serialize;
use tracing::info;

use cascade_core::config::SimulationConfig;
use cascade_core::errors::{CascadeResult, ConfigError, GraphError};
use cascade_scm::ScmModel;

use crate::do_query;
use crate::summary::mean;

/// Best candidate found by [`crate::Simulator::optimize_target`].
#[derive(Debug, Clone, Serialize)]
pub struct OptimizeOutcome {
    /// Intervention value whose simulated target mean landed closest.
    pub suggested_value: f64,
    /// Simulated target mean under that intervention.
    pub predicted_outcome: f64,
    /// Absolute distance between prediction and desired value.
    pub target_gap: f64,
}

/// Evaluate an evenly spaced candidate grid over `bounds`, simulating
/// `config.optimize_samples` units per candidate, and keep the candidate
/// whose target mean lands closest to `target_value`.
pub(crate) fn search<R: Rng + ?Sized>(
    model: &ScmModel,
    config: &SimulationConfig,
    control_node: &str,
    target_node: &str,
    target_value: f64,
    bounds: (f64, f64),
    rng: &mut R,
) -> CascadeResult<OptimizeOutcome> {
    for node in [control_node, target_node] {
        if !model.dag().contains(node) {
            return Err(GraphError::NodeNotFound {
                node: node.to_string(),
            }
            .into());
        }
    }
    let (low, high) = bounds;
    if !low.is_finite() || !high.is_finite() || low > high {
        return Err(ConfigError::ValidationFailed {
            field: "optimize bounds".to_string(),
            message: format!("need finite low <= high, got ({low}, {high})"),
        }
        .into());
    }

    let candidates = config.optimize_candidates.max(2);
    let step = (high - low) / (candidates - 1) as f64;

    let mut best = OptimizeOutcome {
        suggested_value: low,
        predicted_outcome: f64::NAN,
        target_gap: f64::INFINITY,
    };
    for i in 0..candidates {
        let candidate = low + step * i as f64;
        let forced = HashMap::from([(control_node.to_string(), candidate)]);
        let run = do_query::run(model, &forced, config.optimize_samples, rng)?;
        let predicted = mean(run.column(target_node).unwrap_or(&[]));
        let gap = (predicted - target_value).abs();
        if gap < best.target_gap {
            best = OptimizeOutcome {
                suggested_value: candidate,
                predicted_outcome: predicted,
                target_gap: gap,
            };
        }
    }

    info!(
        control_node,
        target_node,
        target_value,
        suggested = best.suggested_value,
        predicted = best.predicted_outcome,
        "target optimization complete"
    );
    Ok(best)
}
