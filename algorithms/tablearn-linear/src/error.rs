//! An error when modeling a Linear algorithm
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LinearError>;

/// An error when modeling a Linear algorithm
#[derive(Error, Debug)]
pub enum LinearError {
    #[error(transparent)]
    BaseCrate(#[from] tablearn::Error),
    #[error("At least one sample needed")]
    NotEnoughSamples,
    #[error("Simple linear regression takes exactly one feature, got {0}")]
    FeatureCount(usize),
    #[error("The feature is constant, the slope is undefined")]
    ConstantFeature,
    #[error("The least squares solution is not finite")]
    NonFinite,
    #[error(transparent)]
    LinalgError(#[from] linfa_linalg::LinalgError),
}
