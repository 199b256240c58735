//! # cascade-scm
//!
//! The structural causal model: normalization statistics, per-node
//! structural functions, gradient-descent fitting, prediction, and
//! artifact persistence.
//!
//! | Module | Role |
//! |--------|------|
//! | `stats` | Per-node mean/std and standardization |
//! | `function` | Structural functions and node dispatch |
//! | `training` | Full-batch gradient descent |
//! | `model` | [`ScmModel`]: fit / predict / accessors |
//! | `persistence` | Versioned, hash-checked JSON artifacts |
//! | `active` | Swap-on-fit shared model slot |

pub mod active;
pub mod function;
pub mod model;
pub mod persistence;
pub mod stats;
pub mod training;

pub use active::ActiveModel;
pub use function::{NodeModel, StructuralFunction};
pub use model::{FitReport, ScmModel};
pub use stats::NodeStats;
