//! Full-batch gradient descent for structural functions.
//!
//! Plain mean-squared-error descent over the whole standardized sample,
//! run for a fixed number of epochs. Small models and small data make
//! anything fancier unnecessary.

use rand::rngs::StdRng;
use rand::Rng;

use cascade_core::config::FitConfig;
use cascade_core::errors::ModelError;

use crate::function::StructuralFunction;

/// A trained function plus the training loss it ended on.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub function: StructuralFunction,
    /// Mean squared error over the training sample at the final epoch.
    pub final_loss: f64,
}

/// Train one node's function. `rows` holds standardized parent values,
/// one inner vector per sample; `targets` the standardized node values.
/// The caller seeds `rng`, so identical inputs produce identical weights.
pub fn train_node(
    rows: &[Vec<f64>],
    targets: &[f64],
    config: &FitConfig,
    rng: &mut StdRng,
) -> Result<TrainingOutcome, ModelError> {
    let arity = rows.first().map_or(0, Vec::len);
    let hidden = config.hidden_width;
    let lr = config.learning_rate;

    // Uniform init scaled by fan-in, one layer at a time.
    let bound1 = 1.0 / (arity.max(1) as f64).sqrt();
    let bound2 = 1.0 / (hidden.max(1) as f64).sqrt();
    let w1: Vec<Vec<f64>> = (0..hidden)
        .map(|_| (0..arity).map(|_| rng.gen_range(-bound1..bound1)).collect())
        .collect();
    let b1: Vec<f64> = (0..hidden).map(|_| rng.gen_range(-bound1..bound1)).collect();
    let w2: Vec<f64> = (0..hidden).map(|_| rng.gen_range(-bound2..bound2)).collect();
    let b2 = rng.gen_range(-bound2..bound2);
    let mut function = StructuralFunction::from_weights(w1, b1, w2, b2)?;

    let n = rows.len();
    let inv_n = 1.0 / n.max(1) as f64;

    // Scratch buffers reused across epochs.
    let mut pre = vec![0.0; hidden];
    let mut act = vec![0.0; hidden];
    let mut grad_w1 = vec![vec![0.0; arity]; hidden];
    let mut grad_b1 = vec![0.0; hidden];
    let mut grad_w2 = vec![0.0; hidden];
    let mut final_loss = 0.0;

    for _ in 0..config.epochs {
        for g in grad_w1.iter_mut() {
            g.iter_mut().for_each(|v| *v = 0.0);
        }
        grad_b1.iter_mut().for_each(|v| *v = 0.0);
        grad_w2.iter_mut().for_each(|v| *v = 0.0);
        let mut grad_b2 = 0.0;
        let mut loss = 0.0;

        for (row, &target) in rows.iter().zip(targets) {
            // Forward pass, keeping pre-activations for the ReLU gradient.
            for h in 0..hidden {
                let z: f64 = function.w1[h]
                    .iter()
                    .zip(row)
                    .map(|(w, x)| w * x)
                    .sum::<f64>()
                    + function.b1[h];
                pre[h] = z;
                act[h] = z.max(0.0);
            }
            let prediction: f64 = function
                .w2
                .iter()
                .zip(&act)
                .map(|(w, a)| w * a)
                .sum::<f64>()
                + function.b2;

            let err = prediction - target;
            loss += err * err;

            // Backward pass for the squared-error mean.
            let d_pred = 2.0 * err * inv_n;
            grad_b2 += d_pred;
            for h in 0..hidden {
                grad_w2[h] += d_pred * act[h];
                if pre[h] > 0.0 {
                    let d_hidden = d_pred * function.w2[h];
                    grad_b1[h] += d_hidden;
                    for (g, x) in grad_w1[h].iter_mut().zip(row) {
                        *g += d_hidden * x;
                    }
                }
            }
        }

        for h in 0..hidden {
            for (w, g) in function.w1[h].iter_mut().zip(&grad_w1[h]) {
                *w -= lr * g;
            }
            function.b1[h] -= lr * grad_b1[h];
            function.w2[h] -= lr * grad_w2[h];
        }
        function.b2 -= lr * grad_b2;

        final_loss = loss * inv_n;
    }

    Ok(TrainingOutcome {
        function,
        final_loss,
    })
}
