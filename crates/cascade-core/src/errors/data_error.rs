/// Observational data errors.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("missing column '{column}' required by {required_by}")]
    MissingColumn { column: String, required_by: String },

    #[error("column '{column}' has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("dataset is empty")]
    EmptyDataset,
}
