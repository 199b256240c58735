//! Per-node normalization statistics.
//!
//! All structural functions operate in standardized (z-score) space; these
//! statistics carry each variable between raw and standardized units.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use cascade_core::config::defaults::ZERO_STD_FALLBACK;
use cascade_core::dataset::{is_missing, Dataset};

/// Mean and standard deviation of one variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeStats {
    pub mean: f64,
    pub std: f64,
}

impl NodeStats {
    pub fn standardize(&self, value: f64) -> f64 {
        (value - self.mean) / self.std
    }

    pub fn destandardize(&self, value: f64) -> f64 {
        value * self.std + self.mean
    }
}

impl Default for NodeStats {
    /// Stats of a variable with no observations: standard normal, so a
    /// data-less root behaves as pure noise around zero.
    fn default() -> Self {
        Self {
            mean: 0.0,
            std: 1.0,
        }
    }
}

/// Compute per-node statistics over the observed (non-missing) cells.
///
/// The sample standard deviation uses the n-1 denominator. A zero or
/// undefined deviation is replaced with 1.0 so standardization never
/// divides by zero; nodes without a column fall back to mean 0, std 1.
pub fn compute_stats<S: AsRef<str>>(data: &Dataset, nodes: &[S]) -> BTreeMap<String, NodeStats> {
    let mut stats = BTreeMap::new();
    for node in nodes {
        let node = node.as_ref();
        let node_stats = match data.column(node) {
            Some(values) => {
                let (node_stats, floored) = column_stats(values);
                if floored {
                    debug!(node, "standard deviation floored to 1.0");
                }
                node_stats
            }
            None => NodeStats::default(),
        };
        stats.insert(node.to_string(), node_stats);
    }
    stats
}

/// Returns the column's stats plus whether the deviation was floored.
fn column_stats(values: &[f64]) -> (NodeStats, bool) {
    let observed: Vec<f64> = values.iter().copied().filter(|v| !is_missing(*v)).collect();
    if observed.is_empty() {
        return (NodeStats::default(), false);
    }

    let n = observed.len() as f64;
    let mean = observed.iter().sum::<f64>() / n;

    // Sample deviation is undefined below two observations.
    let (std, floored) = if observed.len() < 2 {
        (ZERO_STD_FALLBACK, true)
    } else {
        let var = observed.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let std = var.sqrt();
        if std == 0.0 || !std.is_finite() {
            (ZERO_STD_FALLBACK, true)
        } else {
            (std, false)
        }
    };

    (NodeStats { mean, std }, floored)
}
