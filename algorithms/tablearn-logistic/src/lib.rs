//! # Logistic Regression
//!
//! `tablearn-logistic` provides a two class logistic regression model, trained with full-batch
//! gradient descent on the unregularized log-loss.
//!
//! Targets are expected to be `0` and `1`. They are used as they are in the gradient, so other
//! values still train a model but predictions are always rounded to `0` or `1`.
//!
//! ```rust
//! use tablearn::prelude::*;
//! use tablearn_logistic::LogisticRegression;
//! # use ndarray::array;
//!
//! let dataset = Dataset::new(
//!     array![[-2., -1.], [-1., -2.], [1., 2.], [2., 1.]],
//!     array![0., 0., 1., 1.],
//! );
//!
//! let model = LogisticRegression::default()
//!     .learning_rate(0.1)
//!     .fit(&dataset)
//!     .unwrap();
//!
//! let probabilities = model.predict_probabilities(dataset.records());
//! assert!(probabilities[0] < 0.5 && probabilities[3] > 0.5);
//! ```

pub mod error;
mod hyperparams;

use log::debug;
use ndarray::{Array1, ArrayBase, Data, Ix1, Ix2, Zip};
use tablearn::dataset::DatasetBase;
use tablearn::traits::{Fit, PredictInplace};
use tablearn::Float;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{Error, Result};
pub use hyperparams::{LogisticRegressionParams, LogisticRegressionValidParams};

/// Scores are clamped into this range before the sigmoid is applied
const SCORE_LIMIT: f64 = 500.0;

pub type LogisticRegression<F> = LogisticRegressionParams<F>;

impl<F: Float> LogisticRegressionValidParams<F> {
    /// Ensure that `x` and `y` have the right shape and that all data is finite.
    fn validate_data<A: Data<Elem = F>, B: Data<Elem = F>>(
        &self,
        x: &ArrayBase<A, Ix2>,
        y: &ArrayBase<B, Ix1>,
    ) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(Error::MismatchedShapes(x.nrows(), y.len()));
        }
        if x.nrows() == 0 {
            return Err(Error::NotEnoughSamples);
        }
        if x.iter().any(|x| !x.is_finite()) || y.iter().any(|y| !y.is_finite()) {
            return Err(Error::InvalidValues);
        }
        Ok(())
    }
}

impl<F: Float, D: Data<Elem = F>, T: Data<Elem = F>>
    Fit<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>, Error> for LogisticRegressionValidParams<F>
{
    type Object = FittedLogisticRegression<F>;

    /// Given a 2-dimensional feature matrix array `x` with shape
    /// (n_samples, n_features) and an array of `0`/`1` targets,
    /// create a `FittedLogisticRegression` object which allows making
    /// predictions.
    ///
    /// Weights and bias start at zero. Every iteration computes the predicted probabilities
    /// of all samples and moves weights and bias against the mean gradient of the log-loss.
    ///
    /// This method returns an error if any values are `Inf` or `NaN`, if `y` doesn't have as
    /// many items as `x` has rows or if there are no samples at all.
    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>>,
    ) -> Result<Self::Object> {
        let (x, y) = (dataset.records(), dataset.targets());
        self.validate_data(x, y)?;

        let n = F::cast(x.nrows());
        let mut weights = Array1::zeros(x.ncols());
        let mut bias = F::zero();

        for _ in 0..self.max_iterations() {
            let errors = probabilities(x, &weights, bias) - y;

            let weight_gradient = x.t().dot(&errors) / n;
            let bias_gradient = errors.sum() / n;

            weights.scaled_add(-self.learning_rate(), &weight_gradient);
            bias -= self.learning_rate() * bias_gradient;
        }

        debug!(
            "fitted logistic regression on {} samples, bias {:?}",
            x.nrows(),
            bias
        );

        Ok(FittedLogisticRegression { weights, bias })
    }
}

/// The logistic function of a clamped score
fn logistic<F: Float>(x: F) -> F {
    let limit = F::cast(SCORE_LIMIT);
    let x = x.max(-limit).min(limit);
    F::one() / (F::one() + (-x).exp())
}

fn probabilities<F: Float, A: Data<Elem = F>>(
    x: &ArrayBase<A, Ix2>,
    weights: &Array1<F>,
    bias: F,
) -> Array1<F> {
    let mut probs = x.dot(weights) + bias;
    probs.mapv_inplace(logistic);
    probs
}

/// A fitted logistic regression which can make predictions
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct FittedLogisticRegression<F: Float> {
    weights: Array1<F>,
    bias: F,
}

impl<F: Float> FittedLogisticRegression<F> {
    /// One weight per feature
    pub fn weights(&self) -> &Array1<F> {
        &self.weights
    }

    pub fn bias(&self) -> F {
        self.bias
    }

    /// Given a feature matrix, predict the probabilities that a sample
    /// belongs to class `1`.
    pub fn predict_probabilities<A: Data<Elem = F>>(&self, x: &ArrayBase<A, Ix2>) -> Array1<F> {
        probabilities(x, &self.weights, self.bias)
    }
}

impl<F: Float, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<F>>
    for FittedLogisticRegression<F>
{
    /// Given a feature matrix, predict `0` or `1` by rounding the probability of class `1`.
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<F>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );
        assert_eq!(
            x.ncols(),
            self.weights.len(),
            "Number of data features must match the number of features the model was trained with."
        );

        Zip::from(&self.predict_probabilities(x))
            .and(y)
            .for_each(|prob, out| *out = prob.round());
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        Array1::zeros(x.nrows())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};
    use rand::{rngs::SmallRng, SeedableRng};
    use tablearn::metrics::ToConfusionMatrix;
    use tablearn::traits::Predict;
    use tablearn::Dataset;

    #[test]
    fn zero_iterations_predict_one_half() {
        let dataset = Dataset::new(array![[1., 2.], [3., 4.]], array![0., 1.]);
        let model = LogisticRegression::default()
            .max_iterations(0)
            .fit(&dataset)
            .unwrap();

        assert_eq!(model.weights(), &array![0., 0.]);
        assert_abs_diff_eq!(model.bias(), 0.);
        assert_abs_diff_eq!(
            model.predict_probabilities(dataset.records()),
            array![0.5, 0.5]
        );
    }

    #[test]
    fn single_gradient_step() {
        // initial errors are [0.5, -0.5]
        let dataset = Dataset::new(array![[1.], [3.]], array![0., 1.]);
        let model = LogisticRegression::default()
            .learning_rate(0.1)
            .max_iterations(1)
            .fit(&dataset)
            .unwrap();

        assert_abs_diff_eq!(model.weights()[0], 0.05, epsilon = 1e-12);
        assert_abs_diff_eq!(model.bias(), 0., epsilon = 1e-12);
    }

    #[test]
    fn separable_data() {
        let mut rng = SmallRng::seed_from_u64(42);
        let dataset = tablearn_datasets::generate::linearly_separable(50, &mut rng);

        let model = LogisticRegression::default().fit(&dataset).unwrap();
        let accuracy = model
            .predict(&dataset)
            .confusion_matrix(dataset.targets())
            .unwrap()
            .accuracy();

        assert!(accuracy >= 0.9, "accuracy {}", accuracy);
        assert!(model.weights().iter().all(|w| *w > 0.));
    }

    #[test]
    fn extreme_scores_stay_finite() {
        let dataset = Dataset::new(array![[-1e6], [1e6]], array![0., 1.]);
        let model = LogisticRegression::default()
            .max_iterations(10)
            .fit(&dataset)
            .unwrap();

        let probs = model.predict_probabilities(dataset.records());
        assert!(probs.iter().all(|p| p.is_finite()));
        assert_eq!(model.predict(dataset.records()), array![0., 1.]);
    }

    #[test]
    fn rejects_invalid_learning_rate() {
        let dataset = Dataset::new(array![[1.]], array![1.]);

        let res = LogisticRegression::default()
            .learning_rate(0.)
            .fit(&dataset);
        assert!(matches!(res, Err(Error::InvalidLearningRate)));

        let res = LogisticRegression::default()
            .learning_rate(f64::NAN)
            .fit(&dataset);
        assert!(matches!(res, Err(Error::InvalidLearningRate)));
    }

    #[test]
    fn rejects_invalid_data() {
        let res = LogisticRegression::default().fit(&Dataset::new(array![[f64::NAN]], array![1.]));
        assert!(matches!(res, Err(Error::InvalidValues)));

        let res = LogisticRegression::default().fit(&Dataset::new(
            Array2::<f64>::zeros((0, 2)),
            Array1::<f64>::zeros(0),
        ));
        assert!(matches!(res, Err(Error::NotEnoughSamples)));

        let res = LogisticRegression::default().fit(&Dataset::new(array![[1.], [2.]], array![1.]));
        assert!(matches!(res, Err(Error::MismatchedShapes(2, 1))));
    }
}
