/// Errors from tree and forest training or inference.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    /// Returned when the training dataset has zero rows.
    #[error("training dataset has zero rows")]
    EmptyDataset,

    /// Returned when rows carry a label but no feature columns.
    #[error("training dataset has zero feature columns")]
    ZeroFeatures,

    /// Returned when a row has a different length than the first row.
    #[error("row {row_index} has {got} values, expected {expected}")]
    RowLengthMismatch {
        /// The expected row length (features plus label).
        expected: usize,
        /// The actual length of the offending row.
        got: usize,
        /// The zero-based index of the offending row.
        row_index: usize,
    },

    /// Returned when a numeric cell is NaN or infinite.
    #[error("non-finite value at row {row_index}, column {column}")]
    NonFiniteValue {
        /// The zero-based index of the offending row.
        row_index: usize,
        /// The zero-based index of the offending column.
        column: usize,
    },

    /// Returned when the per-tree sample size is zero or exceeds the dataset.
    #[error("sample size {requested} is outside [1, {available}]")]
    InvalidSampleSize {
        /// The sample size derived from `sample_fraction`.
        requested: usize,
        /// The number of rows in the dataset.
        available: usize,
    },

    /// Returned when tree_count is zero.
    #[error("tree_count must be at least 1, got {tree_count}")]
    InvalidTreeCount {
        /// The invalid tree_count value provided.
        tree_count: usize,
    },

    /// Returned when max_features resolves to 0 or exceeds the feature count.
    #[error("max_features resolved to {max_features}, but must be in [1, {n_features}]")]
    InvalidMaxFeatures {
        /// The resolved max_features value.
        max_features: usize,
        /// The number of feature columns in the dataset.
        n_features: usize,
    },

    /// Returned when the pruning threshold is NaN or infinite.
    #[error("min_pruning_gain must be finite, got {min_gain}")]
    InvalidPruningGain {
        /// The invalid threshold.
        min_gain: f64,
    },

    /// Returned when a row handed to inference is shorter than the feature count.
    #[error("prediction input has {got} values, expected at least {expected}")]
    RowTooShort {
        /// The number of feature columns the model was trained on.
        expected: usize,
        /// The length of the prediction row.
        got: usize,
    },

    /// Returned when routing ends in a leaf that holds no training rows.
    #[error("row routed to a leaf with no class counts")]
    EmptyLeaf,

    /// Returned when OOB evaluation fails (no row was left out of any tree).
    #[error("OOB evaluation failed: {reason}")]
    OobEvaluationFailed {
        /// Human-readable description of why OOB evaluation failed.
        reason: String,
    },
}
