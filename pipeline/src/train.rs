//! Split, fit, predict and evaluate
use std::time::Instant;

use log::info;
use rand::{rngs::StdRng, SeedableRng};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use tablearn::metrics::{ClassificationReport, RegressionReport, ToConfusionMatrix};
use tablearn::problem::ProblemType;
use tablearn::{Dataset, Error, ParamGuard};

use crate::error::{PipelineError, Result};
use crate::model::{predict, ModelKind, ModelRegistry};
use crate::results::{Metrics, TrainingResult};

/// Checked hyperparameters of the trainer
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainerValidParams {
    train_ratio: f64,
    shuffle: Option<u64>,
}

impl TrainerValidParams {
    /// Share of rows used for fitting
    pub fn train_ratio(&self) -> f64 {
        self.train_ratio
    }

    /// Seed of the shuffle before the split, `None` keeps the original order
    pub fn shuffle(&self) -> Option<u64> {
        self.shuffle
    }

    /// Train a model on the leading rows of `dataset` and evaluate it on the remaining rows
    ///
    /// The first `floor(train_ratio * nsamples)` rows are used for fitting. Any failure of the
    /// learner is reported as [`PipelineError::Training`] naming the model.
    pub fn train(
        &self,
        dataset: Dataset<f64, f64>,
        problem_type: ProblemType,
        model: ModelKind,
        registry: &ModelRegistry,
    ) -> Result<TrainingResult> {
        let learner = registry.get(model)?;

        let dataset = match self.shuffle {
            Some(seed) => dataset.shuffle(&mut StdRng::seed_from_u64(seed)),
            None => dataset,
        };
        let (train, test) = dataset.split_with_ratio(self.train_ratio);
        info!(
            "training {} on {} rows, evaluating on {}",
            model,
            train.nsamples(),
            test.nsamples()
        );

        let start = Instant::now();
        let fitted = learner
            .fit(&train)
            .map_err(|source| PipelineError::Training { model, source })?;
        let predictions = predict(fitted.as_ref(), test.records());
        let duration = start.elapsed();
        info!("trained {} in {:?}", model, duration);

        let actual = test.targets().clone();
        let (metrics, confusion_matrix) = match problem_type {
            ProblemType::Regression => (
                Metrics::Regression(RegressionReport::new(&predictions, &actual)),
                None,
            ),
            ProblemType::Classification => {
                let cm = predictions.confusion_matrix(&actual)?;
                (Metrics::Classification(ClassificationReport::new(&cm)), Some(cm))
            }
        };

        Ok(TrainingResult {
            model,
            problem_type,
            metrics,
            predictions,
            actual,
            confusion_matrix,
            duration,
            train_size: train.nsamples(),
        })
    }
}

/// Hyperparameters of the trainer
///
/// The default is the unshuffled 80/20 split, so repeated runs on the same data are identical.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainerParams(TrainerValidParams);

impl TrainerParams {
    pub fn new() -> Self {
        TrainerParams(TrainerValidParams {
            train_ratio: 0.8,
            shuffle: None,
        })
    }

    /// Sets the share of rows used for fitting
    pub fn train_ratio(mut self, train_ratio: f64) -> Self {
        self.0.train_ratio = train_ratio;
        self
    }

    /// Shuffle the rows with a seeded generator before splitting
    pub fn shuffle(mut self, seed: Option<u64>) -> Self {
        self.0.shuffle = seed;
        self
    }
}

impl Default for TrainerParams {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamGuard for TrainerParams {
    type Checked = TrainerValidParams;
    type Error = Error;

    fn check_ref(&self) -> std::result::Result<&Self::Checked, Self::Error> {
        if !(self.0.train_ratio > 0.0 && self.0.train_ratio < 1.0) {
            Err(Error::Parameters(format!(
                "train ratio should be between zero and one, but was {}",
                self.0.train_ratio
            )))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> std::result::Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}
