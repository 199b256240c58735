use serde::{Deserialize, Serialize};

use super::defaults;

/// Model fitting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Full-batch gradient descent iterations per node.
    pub epochs: usize,
    /// Gradient descent step size.
    pub learning_rate: f64,
    /// Hidden layer width of each structural function.
    pub hidden_width: usize,
    /// Base seed for weight initialization. `None` draws from entropy,
    /// making each fit non-deterministic.
    pub seed: Option<u64>,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            epochs: defaults::DEFAULT_EPOCHS,
            learning_rate: defaults::DEFAULT_LEARNING_RATE,
            hidden_width: defaults::DEFAULT_HIDDEN_WIDTH,
            seed: None,
        }
    }
}

impl FitConfig {
    /// Fixes the initialization seed, making the fit deterministic.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
