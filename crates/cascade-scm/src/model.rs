//! The structural causal model: a DAG plus one learned function per
//! non-root variable, with normalization statistics for every variable.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use cascade_core::config::FitConfig;
use cascade_core::dataset::{is_missing, Dataset};
use cascade_core::errors::{CascadeResult, DataError, GraphError, ModelError};
use cascade_core::graph::CausalDag;

use crate::function::{NodeModel, StructuralFunction};
use crate::stats::{compute_stats, NodeStats};
use crate::training::{train_node, TrainingOutcome};

/// Summary of one completed fit.
#[derive(Debug, Clone, Serialize)]
pub struct FitReport {
    pub model_id: Uuid,
    pub trained_at: DateTime<Utc>,
    pub epochs: usize,
    pub learning_rate: f64,
    pub nodes: usize,
    pub edges: usize,
    pub samples: usize,
    pub functions_trained: usize,
    pub parameter_count: usize,
    /// Mean of the per-node final losses.
    pub avg_loss: f64,
    pub node_losses: BTreeMap<String, f64>,
}

/// A fitted (or not-yet-fitted) structural causal model.
///
/// `fit` replaces all learned state wholesale; a failed fit leaves the
/// model exactly as it was, never partially trained.
#[derive(Debug, Clone)]
pub struct ScmModel {
    pub(crate) dag: CausalDag,
    pub(crate) stats: BTreeMap<String, NodeStats>,
    pub(crate) node_models: BTreeMap<String, NodeModel>,
    pub(crate) fitted: bool,
    pub(crate) model_id: Uuid,
    pub(crate) trained_at: Option<DateTime<Utc>>,
}

impl ScmModel {
    /// An unfitted model over the given graph.
    pub fn new(dag: CausalDag) -> Self {
        Self {
            dag,
            stats: BTreeMap::new(),
            node_models: BTreeMap::new(),
            fitted: false,
            model_id: Uuid::new_v4(),
            trained_at: None,
        }
    }

    /// Assemble a fitted model from explicit stats and functions. Nodes
    /// without a function sample their marginal distribution. Each
    /// function's arity must match its node's parent count.
    pub fn from_functions(
        dag: CausalDag,
        stats: BTreeMap<String, NodeStats>,
        functions: BTreeMap<String, StructuralFunction>,
    ) -> CascadeResult<Self> {
        let mut node_models: BTreeMap<String, NodeModel> = dag
            .node_names()
            .into_iter()
            .map(|node| (node, NodeModel::Marginal))
            .collect();
        for (node, function) in functions {
            if !dag.contains(&node) {
                return Err(GraphError::NodeNotFound { node }.into());
            }
            let parents = dag.parents(&node)?;
            if parents.is_empty() {
                return Err(ModelError::MalformedFunction {
                    reason: format!("'{node}' has no parents; roots sample their marginal"),
                }
                .into());
            }
            if function.input_arity() != parents.len() {
                return Err(ModelError::MalformedFunction {
                    reason: format!(
                        "'{node}' takes {} inputs but has {} parents",
                        function.input_arity(),
                        parents.len()
                    ),
                }
                .into());
            }
            node_models.insert(node, NodeModel::Fitted(function));
        }
        Ok(Self {
            dag,
            stats,
            node_models,
            fitted: true,
            model_id: Uuid::new_v4(),
            trained_at: None,
        })
    }

    /// Fit one structural function per non-root node.
    ///
    /// Preconditions are checked before anything is learned: the dataset
    /// must be non-empty, and every non-root node needs a column for
    /// itself and for each of its parents. On error the model keeps its
    /// previous state.
    pub fn fit(&mut self, data: &Dataset, config: &FitConfig) -> CascadeResult<FitReport> {
        if data.is_empty() {
            return Err(DataError::EmptyDataset.into());
        }

        let node_names = self.dag.node_names();

        let mut trainable: Vec<(String, Vec<String>)> = Vec::new();
        for node in &node_names {
            let parents = self.dag.parents(node)?;
            if parents.is_empty() {
                continue;
            }
            let required_by = format!("structural function of '{node}'");
            if !data.has_column(node) {
                return Err(DataError::MissingColumn {
                    column: node.clone(),
                    required_by,
                }
                .into());
            }
            if let Some(parent) = parents.iter().find(|p| !data.has_column(p)) {
                return Err(DataError::MissingColumn {
                    column: parent.clone(),
                    required_by,
                }
                .into());
            }
            trainable.push((node.clone(), parents));
        }

        info!(
            nodes = node_names.len(),
            edges = self.dag.edge_count(),
            samples = data.n_rows(),
            epochs = config.epochs,
            "fitting structural causal model"
        );

        // Step 1: per-node normalization statistics.
        let stats = compute_stats(data, &node_names);

        // Step 2: standardize every observed column. Missing cells map to
        // 0.0, the standardized mean.
        let mut standardized: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for node in &node_names {
            if let Some(values) = data.column(node) {
                let node_stats = stats[node.as_str()];
                let column = values
                    .iter()
                    .map(|&v| {
                        if is_missing(v) {
                            0.0
                        } else {
                            node_stats.standardize(v)
                        }
                    })
                    .collect();
                standardized.insert(node.clone(), column);
            }
        }

        // Step 3: train the non-root functions in parallel. Each node gets
        // its own RNG derived from the base seed, so scheduling order
        // cannot change the result.
        let base_seed = config.seed.unwrap_or_else(rand::random);
        let n = data.n_rows();
        let trained: Vec<(String, TrainingOutcome)> = trainable
            .par_iter()
            .map(|(node, parents)| -> Result<(String, TrainingOutcome), ModelError> {
                let parent_columns: Vec<&[f64]> = parents
                    .iter()
                    .map(|p| standardized[p.as_str()].as_slice())
                    .collect();
                let rows: Vec<Vec<f64>> = (0..n)
                    .map(|i| parent_columns.iter().map(|c| c[i]).collect())
                    .collect();
                let targets = standardized[node.as_str()].as_slice();
                let mut rng = StdRng::seed_from_u64(node_seed(base_seed, node));
                let outcome = train_node(&rows, targets, config, &mut rng)?;
                Ok((node.clone(), outcome))
            })
            .collect::<Result<Vec<_>, ModelError>>()?;

        // Step 4: assemble the new model state and the report.
        let mut node_models: BTreeMap<String, NodeModel> = node_names
            .iter()
            .map(|node| (node.clone(), NodeModel::Marginal))
            .collect();
        let mut node_losses = BTreeMap::new();
        let mut parameter_count = 0;
        let mut total_loss = 0.0;
        for (node, outcome) in trained {
            parameter_count += outcome.function.parameter_count();
            total_loss += outcome.final_loss;
            node_losses.insert(node.clone(), outcome.final_loss);
            node_models.insert(node, NodeModel::Fitted(outcome.function));
        }
        let functions_trained = node_losses.len();
        let avg_loss = total_loss / functions_trained.max(1) as f64;

        self.stats = stats;
        self.node_models = node_models;
        self.fitted = true;
        self.model_id = Uuid::new_v4();
        let trained_at = Utc::now();
        self.trained_at = Some(trained_at);

        info!(
            model_id = %self.model_id,
            functions_trained,
            avg_loss,
            "fit complete"
        );

        Ok(FitReport {
            model_id: self.model_id,
            trained_at,
            epochs: config.epochs,
            learning_rate: config.learning_rate,
            nodes: node_names.len(),
            edges: self.dag.edge_count(),
            samples: data.n_rows(),
            functions_trained,
            parameter_count,
            avg_loss,
            node_losses,
        })
    }

    /// Predict one node's values for each row of `parent_values`.
    ///
    /// Nodes with a fitted function return the deterministic structural
    /// prediction of their parents; marginal nodes draw one sample per
    /// row from `Normal(mean, std)`. Parent cells that are absent or
    /// missing enter the function as the standardized mean (0.0).
    pub fn predict_node<R: Rng + ?Sized>(
        &self,
        node: &str,
        parent_values: &Dataset,
        rng: &mut R,
    ) -> CascadeResult<Vec<f64>> {
        if !self.fitted {
            return Err(ModelError::NotFitted {
                operation: "predict_node".to_string(),
            }
            .into());
        }
        if !self.dag.contains(node) {
            return Err(GraphError::NodeNotFound {
                node: node.to_string(),
            }
            .into());
        }

        let n = parent_values.n_rows();
        let node_stats = self.stats_for(node);

        match self.node_models.get(node) {
            Some(NodeModel::Fitted(function)) => {
                let parents = self.dag.parents(node)?;
                let parent_stats: Vec<NodeStats> =
                    parents.iter().map(|p| self.stats_for(p)).collect();
                let mut row = vec![0.0; parents.len()];
                let predictions = (0..n)
                    .map(|i| {
                        for ((slot, parent), stats) in
                            row.iter_mut().zip(&parents).zip(&parent_stats)
                        {
                            *slot = match parent_values.value(i, parent) {
                                Some(v) if !is_missing(v) => stats.standardize(v),
                                _ => 0.0,
                            };
                        }
                        node_stats.destandardize(function.forward(&row))
                    })
                    .collect();
                Ok(predictions)
            }
            _ => Ok((0..n)
                .map(|_| {
                    let z: f64 = rng.sample(StandardNormal);
                    node_stats.mean + node_stats.std * z
                })
                .collect()),
        }
    }

    /// Standardized structural prediction for `node` given its parents'
    /// standardized values (in DAG parent order). `None` for marginal
    /// nodes.
    pub fn structural_value(&self, node: &str, standardized_parents: &[f64]) -> Option<f64> {
        match self.node_models.get(node) {
            Some(NodeModel::Fitted(function)) => Some(function.forward(standardized_parents)),
            _ => None,
        }
    }

    /// Stats for a node, defaulting to mean 0, std 1 when unknown.
    pub fn stats_for(&self, node: &str) -> NodeStats {
        self.stats.get(node).copied().unwrap_or_default()
    }

    pub fn dag(&self) -> &CausalDag {
        &self.dag
    }

    pub fn stats(&self) -> &BTreeMap<String, NodeStats> {
        &self.stats
    }

    pub fn node_model(&self, node: &str) -> Option<&NodeModel> {
        self.node_models.get(node)
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    pub fn model_id(&self) -> Uuid {
        self.model_id
    }

    pub fn trained_at(&self) -> Option<DateTime<Utc>> {
        self.trained_at
    }
}

/// Per-node RNG seed: stable under parallel scheduling, distinct across
/// nodes, reproducible from the base seed.
fn node_seed(base: u64, node: &str) -> u64 {
    let digest = blake3::hash(node.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest.as_bytes()[..8]);
    base ^ u64::from_le_bytes(bytes)
}
