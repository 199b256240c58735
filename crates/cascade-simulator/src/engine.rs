//! The simulator: seeded, shareable Monte Carlo queries.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use cascade_core::config::SimulationConfig;
use cascade_core::dataset::Dataset;
use cascade_core::errors::{CascadeResult, ModelError};
use cascade_scm::ScmModel;

use crate::optimize::{self, OptimizeOutcome};
use crate::summary::{summarize, SimulationSummary};
use crate::{do_query, uplift};

/// Interventional simulation over a shared fitted model.
///
/// The simulator never mutates the model, so one instance can serve
/// concurrent queries. Seeding is optional: with a base seed, the k-th
/// query draws from `seed + k` and a fresh simulator replays the same
/// query sequence exactly; without one, every query is entropy-seeded.
#[derive(Debug)]
pub struct Simulator {
    model: Arc<ScmModel>,
    config: SimulationConfig,
    base_seed: Option<u64>,
    queries_issued: AtomicU64,
}

impl Simulator {
    /// Wrap a fitted model; rejects unfitted ones up front.
    pub fn new(model: Arc<ScmModel>) -> CascadeResult<Self> {
        if !model.is_fitted() {
            return Err(ModelError::NotFitted {
                operation: "interventional simulation".to_string(),
            }
            .into());
        }
        Ok(Self {
            model,
            config: SimulationConfig::default(),
            base_seed: None,
            queries_issued: AtomicU64::new(0),
        })
    }

    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix the base seed for reproducible query sequences.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.base_seed = Some(seed);
        self
    }

    /// One RNG per query. The counter advances even when unseeded so the
    /// two modes issue queries identically.
    fn query_rng(&self) -> StdRng {
        let k = self.queries_issued.fetch_add(1, Ordering::Relaxed);
        match self.base_seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(k)),
            None => StdRng::from_entropy(),
        }
    }

    /// Sample `n_samples` fresh units under `do(interventions)`.
    pub fn run_do_query(
        &self,
        interventions: &HashMap<String, f64>,
        n_samples: usize,
    ) -> CascadeResult<Dataset> {
        let mut rng = self.query_rng();
        debug!(
            intervened = interventions.len(),
            n_samples, "running do-query"
        );
        do_query::run(&self.model, interventions, n_samples, &mut rng)
    }

    /// `run_do_query` with the configured default sample count.
    pub fn run_do_query_default(
        &self,
        interventions: &HashMap<String, f64>,
    ) -> CascadeResult<Dataset> {
        self.run_do_query(interventions, self.config.default_samples)
    }

    /// `run_do_query` against a caller-owned RNG, bypassing the seed
    /// sequence. Useful when a caller interleaves queries with other
    /// draws and wants a single reproducible stream.
    pub fn run_do_query_with_rng<R: Rng + ?Sized>(
        &self,
        interventions: &HashMap<String, f64>,
        n_samples: usize,
        rng: &mut R,
    ) -> CascadeResult<Dataset> {
        do_query::run(&self.model, interventions, n_samples, rng)
    }

    /// Average treatment effect on `target`: treatment minus control,
    /// `n_samples` fresh units per arm.
    pub fn compute_uplift(
        &self,
        control: &HashMap<String, f64>,
        treatment: &HashMap<String, f64>,
        target: &str,
        n_samples: usize,
    ) -> CascadeResult<f64> {
        let mut rng = self.query_rng();
        uplift::compute(&self.model, control, treatment, target, n_samples, &mut rng)
    }

    /// `compute_uplift` with the configured per-arm sample count.
    pub fn compute_uplift_default(
        &self,
        control: &HashMap<String, f64>,
        treatment: &HashMap<String, f64>,
        target: &str,
    ) -> CascadeResult<f64> {
        self.compute_uplift(control, treatment, target, self.config.uplift_samples)
    }

    /// `compute_uplift` against a caller-owned RNG.
    pub fn compute_uplift_with_rng<R: Rng + ?Sized>(
        &self,
        control: &HashMap<String, f64>,
        treatment: &HashMap<String, f64>,
        target: &str,
        n_samples: usize,
        rng: &mut R,
    ) -> CascadeResult<f64> {
        uplift::compute(&self.model, control, treatment, target, n_samples, rng)
    }

    /// Summarize a simulated population with the configured quantile band.
    pub fn summarize(&self, data: &Dataset) -> SimulationSummary {
        summarize(data, self.config.lower_quantile, self.config.upper_quantile)
    }

    /// Search `bounds` for the `control_node` intervention that steers
    /// `target_node`'s simulated mean closest to `target_value`.
    pub fn optimize_target(
        &self,
        control_node: &str,
        target_node: &str,
        target_value: f64,
        bounds: (f64, f64),
    ) -> CascadeResult<OptimizeOutcome> {
        let mut rng = self.query_rng();
        optimize::search(
            &self.model,
            &self.config,
            control_node,
            target_node,
            target_value,
            bounds,
            &mut rng,
        )
    }

    /// The model this simulator samples from.
    pub fn model(&self) -> &ScmModel {
        &self.model
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
