/// Causal graph errors.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("cycle detected in causal graph: {path}")]
    CycleDetected { path: String },

    #[error("node not found in causal graph: {node}")]
    NodeNotFound { node: String },
}
