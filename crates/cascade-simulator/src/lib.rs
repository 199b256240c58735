//! # cascade-simulator
//!
//! Monte Carlo simulation of interventions over a fitted structural
//! causal model. Where the counterfactual engine asks what *would have*
//! happened to one observed unit, the simulator asks what *will* happen
//! on average: it draws whole populations of fresh units under
//! `do(node = value)` and summarizes them.
//!
//! The entry point is [`Simulator`]. Each query samples every root from
//! its marginal, pins intervened nodes to constant columns, and pushes
//! samples through the structural functions in topological order with
//! fresh unit noise per sample.
//!
//! ```no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//! use cascade_simulator::Simulator;
//! # fn demo(model: Arc<cascade_scm::ScmModel>) -> cascade_core::CascadeResult<()> {
//! let simulator = Simulator::new(model)?.with_seed(42);
//! let forced = HashMap::from([("ad_spend".to_string(), 5_000.0)]);
//! let population = simulator.run_do_query(&forced, 10_000)?;
//! let summary = simulator.summarize(&population);
//! println!("expected revenue: {:?}", summary.mean_outcomes.get("revenue"));
//! # Ok(())
//! # }
//! ```

mod do_query;
mod uplift;

pub mod engine;
pub mod optimize;
pub mod summary;

pub use engine::Simulator;
pub use optimize::OptimizeOutcome;
pub use summary::{summarize, SimulationSummary};
