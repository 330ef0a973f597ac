//! Multivariate least squares
#![allow(non_snake_case)]
use crate::error::{LinearError, Result};
use linfa_linalg::qr::LeastSquaresQrInto;
use log::debug;
use ndarray::{concatenate, s, Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2};
use tablearn::dataset::DatasetBase;
use tablearn::traits::{Fit, PredictInplace};
use tablearn::Float;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Linear regression over any number of encoded features
///
/// Finds coefficients `w` and an intercept `b` minimizing `||y - Xw - b||_2` through a QR
/// decomposition of the records. The intercept is fitted as the coefficient of an extra column of
/// ones. The pipeline falls back to [`SimpleLinearRegression`](crate::SimpleLinearRegression) for a
/// single feature.
///
/// ## Examples
///
/// ```rust
/// use tablearn::prelude::*;
/// use tablearn_linear::LinearRegression;
/// use ndarray::array;
///
/// let dataset = Dataset::new(array![[0., 1.], [1., 0.], [2., 2.], [3., 1.]], array![2., 3., 7., 8.]);
/// let fitted = LinearRegression::default().fit(&dataset).unwrap();
/// let pred = fitted.predict(&dataset);
///
/// assert!(pred.mean_squared_error(dataset.targets()) < 1e-12);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRegression {
    fit_intercept: bool,
}

/// Coefficients and intercept found by [`LinearRegression`]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct FittedLinearRegression<F> {
    pub(crate) intercept: F,
    pub(crate) params: Array1<F>,
}

impl Default for LinearRegression {
    fn default() -> Self {
        LinearRegression::new()
    }
}

impl LinearRegression {
    /// Least squares with an intercept
    pub fn new() -> LinearRegression {
        LinearRegression {
            fit_intercept: true,
        }
    }

    /// Without an intercept the fitted plane passes through the origin
    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }
}

/// Check that records and targets line up and that there is something to fit
pub(crate) fn validate_data<F: Float>(
    X: &ArrayBase<impl Data<Elem = F>, Ix2>,
    y: &ArrayBase<impl Data<Elem = F>, Ix1>,
) -> Result<()> {
    if X.nrows() != y.len() {
        return Err(tablearn::Error::MismatchedShapes(X.nrows(), y.len()).into());
    }
    if X.nrows() == 0 {
        return Err(LinearError::NotEnoughSamples);
    }
    Ok(())
}

impl<F: Float, D: Data<Elem = F>, T: Data<Elem = F>>
    Fit<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>, LinearError> for LinearRegression
{
    type Object = FittedLinearRegression<F>;

    /// Fails on empty or misaligned data and when the solution is not finite, which happens for
    /// collinear features.
    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>>,
    ) -> Result<Self::Object> {
        let X = dataset.records();
        let y = dataset.targets();
        validate_data(X, y)?;

        let model = if self.fit_intercept {
            let X = concatenate(Axis(1), &[X.view(), Array2::ones((X.nrows(), 1)).view()])
                .map_err(tablearn::Error::from)?;
            let params = solve_least_squares(X, y.to_owned())?;
            let nparams = params.len() - 1;

            FittedLinearRegression {
                intercept: params[nparams],
                params: params.slice(s![..nparams]).to_owned(),
            }
        } else {
            FittedLinearRegression {
                intercept: F::zero(),
                params: solve_least_squares(X.to_owned(), y.to_owned())?,
            }
        };

        debug!(
            "fitted least squares on {} samples, intercept {:?}",
            X.nrows(),
            model.intercept
        );

        Ok(model)
    }
}

/// Solve `min ||X b - y||_2` for `b`
fn solve_least_squares<F: Float>(X: Array2<F>, y: Array1<F>) -> Result<Array1<F>> {
    let out = X
        .least_squares_into(y.insert_axis(Axis(1)))?
        .remove_axis(Axis(1));

    // a rank deficient feature matrix does not always fail the solver
    if out.iter().any(|x| !x.is_finite()) {
        return Err(LinearError::NonFinite);
    }

    Ok(out)
}

impl<F: Float> FittedLinearRegression<F> {
    /// One coefficient per feature
    pub fn params(&self) -> &Array1<F> {
        &self.params
    }

    /// Zero if no intercept was fitted
    pub fn intercept(&self) -> F {
        self.intercept
    }
}

impl<F: Float, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<F>>
    for FittedLinearRegression<F>
{
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<F>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "records and output targets differ in length"
        );

        *y = x.dot(&self.params) + self.intercept;
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        Array1::zeros(x.nrows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use tablearn::{traits::Predict, Dataset};

    #[test]
    fn recovers_plane_from_exact_data() {
        // spend = 10 + 0.5 * age + 2 * plan
        let dataset = Dataset::new(
            array![[20., 0.], [30., 1.], [40., 0.], [50., 1.], [60., 1.]],
            array![20., 27., 30., 37., 42.],
        );
        let fitted = LinearRegression::new().fit(&dataset).unwrap();

        assert_abs_diff_eq!(fitted.params(), &array![0.5, 2.], epsilon = 1e-10);
        assert_abs_diff_eq!(fitted.intercept(), 10., epsilon = 1e-10);
        assert_abs_diff_eq!(
            fitted.predict(&array![[25., 1.]]),
            array![24.5],
            epsilon = 1e-10
        );
    }

    #[test]
    fn through_origin_without_intercept() {
        let dataset = Dataset::new(array![[2.], [4.]], array![3., 6.]);
        let fitted = LinearRegression::new()
            .with_intercept(false)
            .fit(&dataset)
            .unwrap();

        assert_abs_diff_eq!(fitted.intercept(), 0.);
        assert_abs_diff_eq!(fitted.params(), &array![1.5], epsilon = 1e-12);
    }

    #[test]
    fn minimizes_residuals_of_noisy_points() {
        // best line through (0, 1), (1, 1), (2, 4) is y = 0.5 + 1.5 x
        let dataset = Dataset::new(array![[0.], [1.], [2.]], array![1., 1., 4.]);
        let fitted = LinearRegression::new().fit(&dataset).unwrap();

        assert_abs_diff_eq!(
            fitted.predict(dataset.records()),
            array![0.5, 2., 3.5],
            epsilon = 1e-12
        );
    }

    #[test]
    fn rejects_empty_and_mismatched_data() {
        let dataset = Dataset::new(Array2::<f64>::zeros((0, 1)), Array1::zeros(0));
        assert!(matches!(
            LinearRegression::new().fit(&dataset),
            Err(LinearError::NotEnoughSamples)
        ));

        let dataset = Dataset::new(array![[1.], [2.]], array![1.]);
        assert!(matches!(
            LinearRegression::new().fit(&dataset),
            Err(LinearError::BaseCrate(tablearn::Error::MismatchedShapes(2, 1)))
        ));
    }
}
