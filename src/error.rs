use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BayesError {
    #[error("dataset is empty")]
    EmptyDataset,

    #[error("vector of length {len} has no feature columns (need at least 2 values)")]
    VectorTooShort { len: usize },

    #[error("row {row} has length {found}, expected {expected}")]
    InconsistentVectorLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("got {found} feature values, the model expects {expected}")]
    FeatureCountMismatch { expected: usize, found: usize },

    #[error("row {row} has a NaN class label")]
    InvalidLabel { row: usize },

    #[error("got {predictions} predictions for {rows} rows")]
    PredictionCountMismatch { predictions: usize, rows: usize },
}

pub type Result<T> = std::result::Result<T, BayesError>;
