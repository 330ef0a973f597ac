use crate::error::Error;
use tablearn::{Float, ParamGuard};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A two-class logistic regression model.
///
/// Logistic regression combines linear models with
/// the sigmoid function `sigm(x) = 1/(1+exp(-x))`
/// to learn a family of functions that map the feature space to `[0,1]`.
///
/// The weights are learned with plain full-batch gradient descent, starting from zero and
/// running for a fixed number of iterations. There is no regularization and no early stopping.
///
/// ## Examples
///
/// ```rust
/// use ndarray::array;
/// use tablearn::prelude::*;
/// use tablearn_logistic::LogisticRegression;
///
/// let dataset = Dataset::new(array![[-2.], [-1.], [1.], [2.]], array![0., 0., 1., 1.]);
/// let model = LogisticRegression::default().fit(&dataset).unwrap();
/// let prediction = model.predict(&dataset);
/// assert_eq!(prediction, array![0., 0., 1., 1.]);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegressionValidParams<F: Float> {
    learning_rate: F,
    max_iterations: u64,
}

impl<F: Float> LogisticRegressionValidParams<F> {
    pub fn learning_rate(&self) -> F {
        self.learning_rate
    }

    pub fn max_iterations(&self) -> u64 {
        self.max_iterations
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticRegressionParams<F: Float>(LogisticRegressionValidParams<F>);

impl<F: Float> Default for LogisticRegressionParams<F> {
    fn default() -> LogisticRegressionParams<F> {
        LogisticRegressionParams::new()
    }
}

impl<F: Float> LogisticRegressionParams<F> {
    /// Creates a new LogisticRegression with default configuration.
    pub fn new() -> LogisticRegressionParams<F> {
        Self(LogisticRegressionValidParams {
            learning_rate: F::cast(0.01),
            max_iterations: 1000,
        })
    }

    /// Set the step size of each gradient descent iteration,
    /// defaults to `0.01`.
    pub fn learning_rate(mut self, learning_rate: F) -> Self {
        self.0.learning_rate = learning_rate;
        self
    }

    /// Configure the number of gradient descent iterations,
    /// defaults to `1000`.
    pub fn max_iterations(mut self, max_iterations: u64) -> Self {
        self.0.max_iterations = max_iterations;
        self
    }
}

impl<F: Float> ParamGuard for LogisticRegressionParams<F> {
    type Checked = LogisticRegressionValidParams<F>;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if !self.0.learning_rate.is_finite() || self.0.learning_rate <= F::zero() {
            Err(Error::InvalidLearningRate)
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}
