//! Structural functions and their per-node dispatch.
//!
//! Each non-root variable gets a small two-layer perceptron mapping its
//! standardized parent values to a standardized prediction:
//!
//! ```text
//! f(x) = w2 · relu(w1 · x + b1) + b2
//! ```
//!
//! Weights live in plain vectors; nothing here needs an array crate.

use serde::{Deserialize, Serialize};

use cascade_core::errors::ModelError;

/// A two-layer ReLU perceptron over standardized inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuralFunction {
    /// Hidden-layer weights, one row per hidden unit.
    pub(crate) w1: Vec<Vec<f64>>,
    /// Hidden-layer biases.
    pub(crate) b1: Vec<f64>,
    /// Output weights, one per hidden unit.
    pub(crate) w2: Vec<f64>,
    /// Output bias.
    pub(crate) b2: f64,
}

impl StructuralFunction {
    /// Build a function from explicit weights. Shapes must agree: every
    /// `w1` row has the same length (the input arity), and `b1`/`w2`
    /// match the hidden width.
    pub fn from_weights(
        w1: Vec<Vec<f64>>,
        b1: Vec<f64>,
        w2: Vec<f64>,
        b2: f64,
    ) -> Result<Self, ModelError> {
        let hidden = w1.len();
        if b1.len() != hidden || w2.len() != hidden {
            return Err(ModelError::MalformedFunction {
                reason: format!(
                    "hidden width mismatch: w1 has {hidden} rows, b1 {}, w2 {}",
                    b1.len(),
                    w2.len()
                ),
            });
        }
        let arity = w1.first().map_or(0, Vec::len);
        if arity == 0 {
            return Err(ModelError::MalformedFunction {
                reason: "a structural function needs at least one input".to_string(),
            });
        }
        if let Some(row) = w1.iter().find(|row| row.len() != arity) {
            return Err(ModelError::MalformedFunction {
                reason: format!("ragged w1: expected {arity} inputs, found {}", row.len()),
            });
        }
        Ok(Self { w1, b1, w2, b2 })
    }

    /// Number of inputs the function expects.
    pub fn input_arity(&self) -> usize {
        self.w1.first().map_or(0, Vec::len)
    }

    pub fn hidden_width(&self) -> usize {
        self.w1.len()
    }

    /// Total number of learned parameters.
    pub fn parameter_count(&self) -> usize {
        self.w1.len() * self.input_arity() + self.b1.len() + self.w2.len() + 1
    }

    /// Evaluate the function on one standardized input row.
    pub fn forward(&self, inputs: &[f64]) -> f64 {
        let mut out = self.b2;
        for ((row, b), w_out) in self.w1.iter().zip(&self.b1).zip(&self.w2) {
            let pre: f64 = row.iter().zip(inputs).map(|(w, x)| w * x).sum::<f64>() + b;
            out += w_out * pre.max(0.0);
        }
        out
    }

    /// Evaluate the function sample-wise over parent columns.
    /// `columns[p][i]` is parent `p`'s standardized value for sample `i`.
    pub fn forward_columns(&self, columns: &[&[f64]]) -> Vec<f64> {
        let n = columns.first().map_or(0, |c| c.len());
        let mut row = vec![0.0; columns.len()];
        (0..n)
            .map(|i| {
                for (slot, column) in row.iter_mut().zip(columns) {
                    *slot = column[i];
                }
                self.forward(&row)
            })
            .collect()
    }
}

/// How one node's value is produced.
///
/// Roots have no structural inputs and sample their marginal
/// distribution; everything else evaluates a learned function of its
/// parents. Dispatch is always an explicit match on this enum, never a
/// lookup-miss convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum NodeModel {
    /// Sampled from the node's marginal normal distribution.
    Marginal,
    /// Learned structural function of the node's parents.
    Fitted(StructuralFunction),
}

impl NodeModel {
    pub fn is_fitted(&self) -> bool {
        matches!(self, NodeModel::Fitted(_))
    }
}
