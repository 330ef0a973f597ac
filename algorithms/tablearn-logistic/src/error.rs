use thiserror::Error;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    BaseCrate(#[from] tablearn::Error),
    #[error("Expected `x` and `y` to have same number of rows, got {0} != {1}")]
    MismatchedShapes(usize, usize),
    #[error("Values must be finite and not `Inf`, `-Inf` or `NaN`")]
    InvalidValues,
    #[error("learning_rate must be a positive, finite number")]
    InvalidLearningRate,
    #[error("Logistic regression needs at least one sample")]
    NotEnoughSamples,
}
