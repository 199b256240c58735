//! Configuration for all Cascade subsystems.
//! Each subsystem gets its own struct; `CascadeConfig` aggregates them.

pub mod defaults;
pub mod fit_config;
pub mod simulation_config;

pub use fit_config::FitConfig;
pub use simulation_config::SimulationConfig;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    pub fit: FitConfig,
    pub simulation: SimulationConfig,
}

impl CascadeConfig {
    /// Load configuration from a TOML string. Missing sections and keys
    /// fall back to compiled defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fit.epochs == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "fit.epochs".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.fit.learning_rate <= 0.0 {
            return Err(ConfigError::ValidationFailed {
                field: "fit.learning_rate".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.fit.hidden_width == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "fit.hidden_width".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.simulation.lower_quantile)
            || !(0.0..=1.0).contains(&self.simulation.upper_quantile)
            || self.simulation.lower_quantile >= self.simulation.upper_quantile
        {
            return Err(ConfigError::ValidationFailed {
                field: "simulation.lower_quantile/upper_quantile".to_string(),
                message: "quantiles must lie in [0, 1] with lower < upper".to_string(),
            });
        }
        if self.simulation.optimize_candidates < 2 {
            return Err(ConfigError::ValidationFailed {
                field: "simulation.optimize_candidates".to_string(),
                message: "grid needs at least 2 candidates".to_string(),
            });
        }
        Ok(())
    }
}
