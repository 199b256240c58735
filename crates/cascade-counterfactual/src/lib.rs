//! # cascade-counterfactual
//!
//! Single-unit counterfactual estimation over a fitted structural causal
//! model, following Pearl's three-step procedure:
//!
//! 1. **Abduction** — recover the unit's latent noise from what was observed,
//!    holding the causal mechanisms fixed.
//! 2. **Action** — overwrite the intervened nodes with their forced values.
//! 3. **Prediction** — propagate the mechanisms plus the abducted noise
//!    through the graph in topological order.
//!
//! The entry point is [`CounterfactualEngine`], which wraps an
//! `Arc<ScmModel>` and answers retrospective "what would have happened"
//! queries deterministically: no sampling is involved, so the same
//! observation and intervention always yield the same answer.
//!
//! ```no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use cascade_counterfactual::CounterfactualEngine;
//! # fn demo(model: Arc<cascade_scm::ScmModel>) -> cascade_core::CascadeResult<()> {
//! let engine = CounterfactualEngine::new(model)?;
//! let observed = HashMap::from([("churn_risk".to_string(), 0.8)]);
//! let forced = HashMap::from([("support_tickets".to_string(), 0.0)]);
//! let outcome = engine.estimate_counterfactual(&observed, &forced)?;
//! println!("counterfactual churn: {:?}", outcome.values.get("churn_risk"));
//! # Ok(())
//! # }
//! ```

mod abduction;
mod intervention;
mod propagation;

pub mod engine;

pub use engine::{CounterfactualEngine, CounterfactualOutcome};
