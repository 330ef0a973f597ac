//! Simple linear regression on a single feature
use crate::error::{LinearError, Result};
use crate::ols::{validate_data, FittedLinearRegression};
use log::debug;
use ndarray::{array, ArrayBase, Axis, Data, Ix1, Ix2};
use tablearn::dataset::DatasetBase;
use tablearn::traits::Fit;
use tablearn::Float;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Closed form least squares for exactly one feature
///
/// The slope is the covariance of feature and target divided by the variance of the feature,
/// the intercept puts the line through both means. A constant feature has no slope and fails
/// with [`LinearError::ConstantFeature`].
///
/// ```rust
/// use tablearn::prelude::*;
/// use tablearn_linear::SimpleLinearRegression;
/// use ndarray::array;
///
/// let dataset = Dataset::new(array![[1.], [2.], [3.]], array![2., 4., 6.]);
/// let model = SimpleLinearRegression::default().fit(&dataset).unwrap();
///
/// assert!((model.params()[0] - 2.).abs() < 1e-12);
/// assert!(model.intercept().abs() < 1e-12);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimpleLinearRegression;

impl<F: Float, D: Data<Elem = F>, T: Data<Elem = F>>
    Fit<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>, LinearError> for SimpleLinearRegression
{
    type Object = FittedLinearRegression<F>;

    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>>,
    ) -> Result<Self::Object> {
        let (x, y) = (dataset.records(), dataset.targets());
        if x.ncols() != 1 {
            return Err(LinearError::FeatureCount(x.ncols()));
        }
        validate_data(x, y)?;

        let x = x.index_axis(Axis(1), 0);
        let (x_mean, y_mean) = match (x.mean(), y.mean()) {
            (Some(x_mean), Some(y_mean)) => (x_mean, y_mean),
            _ => return Err(LinearError::NotEnoughSamples),
        };

        let (covariance, variance) = x.iter().zip(y.iter()).fold(
            (F::zero(), F::zero()),
            |(cov, var), (&xi, &yi)| {
                let dx = xi - x_mean;
                (cov + dx * (yi - y_mean), var + dx * dx)
            },
        );
        if variance == F::zero() {
            return Err(LinearError::ConstantFeature);
        }

        let slope = covariance / variance;
        let intercept = y_mean - slope * x_mean;
        debug!("fitted simple linear regression, slope {:?} intercept {:?}", slope, intercept);

        Ok(FittedLinearRegression {
            intercept,
            params: array![slope],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LinearRegression;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::SmallRng, SeedableRng};
    use tablearn::{traits::Predict, Dataset};

    #[test]
    fn least_squares_line() {
        let dataset = Dataset::new(array![[0.], [1.], [2.]], array![0., 0., 2.]);
        let model = SimpleLinearRegression.fit(&dataset).unwrap();

        assert_abs_diff_eq!(model.params()[0], 1., epsilon = 1e-12);
        assert_abs_diff_eq!(model.intercept(), -1. / 3., epsilon = 1e-12);
        assert_abs_diff_eq!(
            model.predict(dataset.records()),
            array![-1. / 3., 2. / 3., 5. / 3.],
            epsilon = 1e-12
        );
    }

    #[test]
    fn agrees_with_least_squares() {
        let mut rng = SmallRng::seed_from_u64(42);
        let dataset = tablearn_datasets::generate::linear(50, &[-1.5], 4., 0.3, &mut rng);

        let simple = SimpleLinearRegression.fit(&dataset).unwrap();
        let ols = LinearRegression::new().fit(&dataset).unwrap();

        assert_abs_diff_eq!(simple.params()[0], ols.params()[0], epsilon = 1e-8);
        assert_abs_diff_eq!(simple.intercept(), ols.intercept(), epsilon = 1e-8);
        assert_abs_diff_eq!(simple.params()[0], -1.5, epsilon = 0.2);
    }

    #[test]
    fn constant_feature_fails() {
        let dataset = Dataset::new(array![[2.], [2.], [2.]], array![1., 2., 3.]);
        assert!(matches!(
            SimpleLinearRegression.fit(&dataset),
            Err(LinearError::ConstantFeature)
        ));
    }

    #[test]
    fn needs_one_feature() {
        let dataset = Dataset::new(array![[1., 2.], [3., 4.]], array![1., 2.]);
        assert!(matches!(
            SimpleLinearRegression.fit(&dataset),
            Err(LinearError::FeatureCount(2))
        ));
    }
}
