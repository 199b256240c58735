//! # cascade-core
//!
//! Foundation crate for the Cascade causal engine.
//! Defines datasets, the causal DAG, errors, config, and tracing setup.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod dataset;
pub mod errors;
pub mod graph;
pub mod tracing_setup;

// Re-export the most commonly used types at the crate root.
pub use config::{CascadeConfig, FitConfig, SimulationConfig};
pub use dataset::Dataset;
pub use errors::{CascadeError, CascadeResult};
pub use graph::{CausalDag, SanitizeReport};
