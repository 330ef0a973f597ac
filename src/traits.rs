//! Provide traits for different classes of algorithms
//!

use crate::dataset::{DatasetBase, Records};
use ndarray::{ArrayBase, Data, Ix2};
use std::convert::From;

/// Fittable algorithms
///
/// A fittable algorithm takes a dataset and creates a concept of some kind about it. For example
/// in decision trees the model is the tree of splits and in logistic regression the learned
/// weights. The fitted model is returned as `Self::Object` and can be used for prediction.
pub trait Fit<R: Records, T, E: std::error::Error + From<crate::error::Error>> {
    type Object;

    fn fit(&self, dataset: &DatasetBase<R, T>) -> Result<Self::Object, E>;
}

/// Predict with model into a mutable reference of targets.
pub trait PredictInplace<R: Records, T> {
    /// Predict something in place
    fn predict_inplace(&self, x: &R, y: &mut T);

    /// Create targets that `predict_inplace` works with.
    fn default_target(&self, x: &R) -> T;
}

/// Predict with model
///
/// This trait assumes the `PredictInplace` implementation and provides additional input/output
/// combinations.
pub trait Predict<R, T> {
    fn predict(&self, x: R) -> T;
}

impl<'a, D, T, O> Predict<&'a ArrayBase<D, Ix2>, T> for O
where
    D: Data,
    ArrayBase<D, Ix2>: Records,
    O: PredictInplace<ArrayBase<D, Ix2>, T>,
{
    fn predict(&self, records: &'a ArrayBase<D, Ix2>) -> T {
        let mut targets = self.default_target(records);
        self.predict_inplace(records, &mut targets);
        targets
    }
}

impl<'a, R: Records, T, S, O> Predict<&'a DatasetBase<R, S>, T> for O
where
    O: PredictInplace<R, T>,
{
    fn predict(&self, ds: &'a DatasetBase<R, S>) -> T {
        let mut targets = self.default_target(&ds.records);
        self.predict_inplace(&ds.records, &mut targets);
        targets
    }
}
