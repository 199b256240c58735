use serde::{Deserialize, Serialize};

use super::defaults;

/// Interventional simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Sample count for a plain do-query when the caller does not pass one.
    pub default_samples: usize,
    /// Sample count per arm of an uplift estimate.
    pub uplift_samples: usize,
    /// Lower quantile of the simulation summary band.
    pub lower_quantile: f64,
    /// Upper quantile of the simulation summary band.
    pub upper_quantile: f64,
    /// Candidate grid size for target optimization.
    pub optimize_candidates: usize,
    /// Sample count per candidate during target optimization.
    pub optimize_samples: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_samples: defaults::DEFAULT_SIMULATION_SAMPLES,
            uplift_samples: defaults::DEFAULT_UPLIFT_SAMPLES,
            lower_quantile: defaults::DEFAULT_LOWER_QUANTILE,
            upper_quantile: defaults::DEFAULT_UPPER_QUANTILE,
            optimize_candidates: defaults::DEFAULT_OPTIMIZE_CANDIDATES,
            optimize_samples: defaults::DEFAULT_OPTIMIZE_SAMPLES,
        }
    }
}
