//! Causal graph structure: the DAG itself plus edge-list repair.

pub mod dag;
pub mod sanitize;

pub use dag::CausalDag;
pub use sanitize::{sanitize_edges, SanitizeReport};
