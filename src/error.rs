//! Error types in tablearn
//!

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("dataset contains no rows")]
    EmptyDataset,
    #[error("target column `{0}` does not exist in the dataset")]
    InvalidTarget(String),
    #[error("feature column `{0}` does not exist in the dataset")]
    InvalidFeature(String),
    #[error("no rows left after dropping missing features and targets")]
    NoValidRows,
    #[error("invalid parameter {0}")]
    Parameters(String),
    #[error("not enough samples to fit a model")]
    NotEnoughSamples,
    #[error("expected records and targets to have the same number of rows, got {0} != {1}")]
    MismatchedShapes(usize, usize),
    #[error("invalid ndarray shape {0}")]
    NdShape(String),
}

impl From<ShapeError> for Error {
    fn from(err: ShapeError) -> Self {
        Error::NdShape(err.to_string())
    }
}
