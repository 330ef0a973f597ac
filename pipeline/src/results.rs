//! The record of a finished training run
use std::time::Duration;

use ndarray::Array1;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use tablearn::metrics::{ClassificationReport, ConfusionMatrix, RegressionReport};
use tablearn::problem::ProblemType;

use crate::model::ModelKind;

/// Held-out metrics, rounded to four decimals
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metrics {
    Regression(RegressionReport),
    Classification(ClassificationReport),
}

impl Metrics {
    /// Metrics as `(name, value)` pairs, in reporting order
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        match self {
            Metrics::Regression(report) => vec![
                ("mse", report.mse),
                ("mae", report.mae),
                ("rmse", report.rmse),
                ("r2", report.r2),
            ],
            Metrics::Classification(report) => vec![
                ("accuracy", report.accuracy),
                ("precision", report.precision),
                ("recall", report.recall),
                ("f1", report.f1),
            ],
        }
    }

    /// Look up a metric by name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }
}

/// Outcome of training and evaluating one model
///
/// Predictions and actual values are index aligned and cover the held-out rows in their
/// original order.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingResult {
    pub(crate) model: ModelKind,
    pub(crate) problem_type: ProblemType,
    pub(crate) metrics: Metrics,
    pub(crate) predictions: Array1<f64>,
    pub(crate) actual: Array1<f64>,
    pub(crate) confusion_matrix: Option<ConfusionMatrix<f64>>,
    pub(crate) duration: Duration,
    pub(crate) train_size: usize,
}

impl TrainingResult {
    pub fn model(&self) -> ModelKind {
        self.model
    }

    /// Name of the trained model
    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }

    pub fn problem_type(&self) -> ProblemType {
        self.problem_type
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn predictions(&self) -> &Array1<f64> {
        &self.predictions
    }

    /// Targets of the held-out rows
    pub fn actual(&self) -> &Array1<f64> {
        &self.actual
    }

    /// Only present for classification
    pub fn confusion_matrix(&self) -> Option<&ConfusionMatrix<f64>> {
        self.confusion_matrix.as_ref()
    }

    /// Wall clock time of fitting and predicting
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn train_size(&self) -> usize {
        self.train_size
    }

    pub fn test_size(&self) -> usize {
        self.actual.len()
    }
}
