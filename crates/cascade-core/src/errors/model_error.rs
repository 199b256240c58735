/// Model lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model is not fitted: {operation} requires a fitted model")]
    NotFitted { operation: String },

    #[error("malformed structural function: {reason}")]
    MalformedFunction { reason: String },
}
