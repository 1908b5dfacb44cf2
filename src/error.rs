//! Error types for tree induction and classification

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Empty dataset, ragged rows, or a feature list that doesn't line up with the rows.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
    /// A tree node names a feature that isn't in the supplied feature names.
    #[error("unknown feature name `{0}`")]
    UnknownFeatureName(String),
    /// The row's value at a decision node was never seen there during training.
    #[error("no branch for value {value} of feature `{feature}`")]
    ClassifyNoMatch { feature: String, value: String },
    /// A split produced a branch without any rows.
    #[error("split on feature `{feature}` left value {value} without rows")]
    EmptyPartition { feature: String, value: String },
    #[error("feature index {index} out of bounds for {n_features} features")]
    FeatureIndexOutOfBounds { index: usize, n_features: usize },
    #[error("model used before calling `fit`")]
    NotFitted,
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("couldn't parse {0}")]
    Parse(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
