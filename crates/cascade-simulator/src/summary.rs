//! Per-node summaries of simulated populations.

use std::collections::BTreeMap;

use serde::Serialize;

use cascade_core::dataset::{is_missing, Dataset};

/// Mean and central quantile band of every column, in raw units.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub mean_outcomes: BTreeMap<String, f64>,
    pub lower_ci: BTreeMap<String, f64>,
    pub upper_ci: BTreeMap<String, f64>,
}

/// Summarize a simulated dataset with an empirical quantile band.
/// Missing cells are skipped; a column with no observed cells reports
/// NaN throughout.
pub fn summarize(data: &Dataset, lower_quantile: f64, upper_quantile: f64) -> SimulationSummary {
    let mut mean_outcomes = BTreeMap::new();
    let mut lower_ci = BTreeMap::new();
    let mut upper_ci = BTreeMap::new();

    for name in data.column_names() {
        let values = data.column(name).unwrap_or(&[]);
        mean_outcomes.insert(name.to_string(), mean(values));
        lower_ci.insert(name.to_string(), quantile(values, lower_quantile));
        upper_ci.insert(name.to_string(), quantile(values, upper_quantile));
    }

    SimulationSummary {
        mean_outcomes,
        lower_ci,
        upper_ci,
    }
}

/// Mean over the observed (non-missing) cells; NaN when none exist.
pub(crate) fn mean(values: &[f64]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for &v in values {
        if !is_missing(v) {
            sum += v;
            count += 1;
        }
    }
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Empirical quantile over the observed cells, interpolating linearly
/// between order statistics. NaN when no cells are observed.
pub(crate) fn quantile(values: &[f64], q: f64) -> f64 {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !is_missing(*v)).collect();
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted.sort_by(f64::total_cmp);

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let below = position.floor() as usize;
    let above = position.ceil() as usize;
    let fraction = position - below as f64;
    sorted[below] + (sorted[above] - sorted[below]) * fraction
}
