//! Errors of a pipeline invocation
use thiserror::Error;

use crate::model::{ModelChoice, ModelKind};
use tablearn::problem::ProblemType;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Type erased error of a learner
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An error which ends a single pipeline invocation
///
/// None of them leave partial results behind, a failed invocation can be repeated with a
/// different target or model.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] tablearn::Error),
    #[error("unknown model `{0}`, expected one of auto, linear, logistic, decisiontree, randomforest")]
    UnknownModel(String),
    #[error("model `{model}` can not be used for {problem}")]
    UnsupportedModel {
        model: ModelChoice,
        problem: ProblemType,
    },
    #[error("no learner registered for {0}")]
    Unregistered(ModelKind),
    #[error("training {model} failed: {source}")]
    Training {
        model: ModelKind,
        #[source]
        source: BoxError,
    },
}
