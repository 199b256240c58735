use super::{ConfigError, DataError, GraphError, ModelError, PersistError};

/// Top-level error for Cascade operations.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum CascadeError {
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Concurrency error: {0}")]
    Concurrency(String),
}

/// Convenience alias used across the workspace.
pub type CascadeResult<T> = Result<T, CascadeError>;
