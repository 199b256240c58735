//! Test fixture support for the Cascade workspace: golden-dataset loading
//! plus deterministic synthetic datasets shared by integration tests.
//!
//! Golden JSON files live in the repo-root `test-fixtures/` directory and
//! carry `input` / `expected_output` objects; the loaders here locate that
//! directory from any crate in the workspace.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::de::DeserializeOwned;

use cascade_core::Dataset;

/// Root directory of the test-fixtures folder.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up to find test-fixtures.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    while !path.join("test-fixtures").join("golden").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures/golden from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as raw JSON Value.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// List all JSON files in a fixture subdirectory.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                Some(path)
            } else {
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Synthetic datasets
// ---------------------------------------------------------------------------
// Linear-Gaussian ground truth with known coefficients: roots are standard
// normal, children are a fixed linear mix of their parents plus small
// Gaussian noise. The coefficients below are what tests assert against.

/// Observational noise added to every non-root variable.
pub const OBS_NOISE_SCALE: f64 = 0.1;

fn draw(rng: &mut StdRng) -> f64 {
    rng.sample(StandardNormal)
}

/// Pair `X0 → X1` with `X1 = 2.0·X0 + ε`, `ε ~ N(0, 0.1)`.
pub fn linear_pair_dataset(n_samples: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let x0: Vec<f64> = (0..n_samples).map(|_| draw(&mut rng)).collect();
    let x1: Vec<f64> = x0
        .iter()
        .map(|&v| 2.0 * v + OBS_NOISE_SCALE * draw(&mut rng))
        .collect();
    Dataset::from_columns([("X0", x0), ("X1", x1)]).expect("columns have equal length")
}

/// Chain `X0 → X1 → X2` with `X1 = 2.0·X0 + ε` and `X2 = 1.5·X1 + ε`.
pub fn linear_chain_dataset(n_samples: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let x0: Vec<f64> = (0..n_samples).map(|_| draw(&mut rng)).collect();
    let x1: Vec<f64> = x0
        .iter()
        .map(|&v| 2.0 * v + OBS_NOISE_SCALE * draw(&mut rng))
        .collect();
    let x2: Vec<f64> = x1
        .iter()
        .map(|&v| 1.5 * v + OBS_NOISE_SCALE * draw(&mut rng))
        .collect();
    Dataset::from_columns([("X0", x0), ("X1", x1), ("X2", x2)]).expect("columns have equal length")
}

/// Diamond `X0 → {X1, X2} → X3` with `X1 = 1.2·X0 + ε`, `X2 = 0.8·X0 + ε`,
/// and `X3 = 1.0·X1 + 1.0·X2 + ε`.
pub fn diamond_dataset(n_samples: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let x0: Vec<f64> = (0..n_samples).map(|_| draw(&mut rng)).collect();
    let x1: Vec<f64> = x0
        .iter()
        .map(|&v| 1.2 * v + OBS_NOISE_SCALE * draw(&mut rng))
        .collect();
    let x2: Vec<f64> = x0
        .iter()
        .map(|&v| 0.8 * v + OBS_NOISE_SCALE * draw(&mut rng))
        .collect();
    let x3: Vec<f64> = x1
        .iter()
        .zip(&x2)
        .map(|(&a, &b)| a + b + OBS_NOISE_SCALE * draw(&mut rng))
        .collect();
    Dataset::from_columns([("X0", x0), ("X1", x1), ("X2", x2), ("X3", x3)])
        .expect("columns have equal length")
}
