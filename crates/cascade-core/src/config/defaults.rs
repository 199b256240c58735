// Single source of truth for all default values.

// --- Fitting ---
pub const DEFAULT_EPOCHS: usize = 100;
pub const DEFAULT_LEARNING_RATE: f64 = 0.01;
pub const DEFAULT_HIDDEN_WIDTH: usize = 16;

// --- Standardization ---
pub const ZERO_STD_FALLBACK: f64 = 1.0;

// --- Simulation ---
pub const DEFAULT_SIMULATION_SAMPLES: usize = 1_000;
pub const DEFAULT_UPLIFT_SAMPLES: usize = 2_000;
pub const DEFAULT_LOWER_QUANTILE: f64 = 0.05;
pub const DEFAULT_UPPER_QUANTILE: f64 = 0.95;

// --- Target optimization ---
pub const DEFAULT_OPTIMIZE_CANDIDATES: usize = 50;
pub const DEFAULT_OPTIMIZE_SAMPLES: usize = 100;

// --- Persistence ---
pub const ARTIFACT_SCHEMA_VERSION: u32 = 1;
