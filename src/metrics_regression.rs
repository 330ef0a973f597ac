//! Common metrics for regression
//!
//! This module implements common comparison metrices for continuous variables.

use ndarray::prelude::*;
use ndarray::Data;
use std::ops::Sub;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::Float;

/// Round to a fixed number of decimal places
///
/// Rounding an already rounded value returns it unchanged. Non-finite values are returned as
/// they are.
pub fn round_to<F: Float>(x: F, digits: i32) -> F {
    let scale = F::cast(10f64.powi(digits));
    (x * scale).round() / scale
}

/// Regression metrices trait
///
/// Implemented for predictions, the ground truth is passed as argument:
/// ```ignore
/// prediction.r2(&ground_truth)
/// ```
/// All metrics of an empty prediction are `NaN`.
pub trait Regression<A, E: Data<Elem = A>> {
    /// Mean error between two continuous variables
    fn mean_absolute_error(&self, compare_to: &ArrayBase<E, Ix1>) -> A;
    /// Mean squared error between two continuous variables
    fn mean_squared_error(&self, compare_to: &ArrayBase<E, Ix1>) -> A;
    /// Square root of the mean squared error
    fn root_mean_squared_error(&self, compare_to: &ArrayBase<E, Ix1>) -> A;
    /// R squared coefficient, is the proportion of the variance in the dependent variable that is
    /// predictable from the independent variable.
    ///
    /// The variance is taken around the mean of the ground truth. A constant ground truth has no
    /// variance, which makes the coefficient infinite or `NaN`.
    fn r2(&self, compare_to: &ArrayBase<E, Ix1>) -> A;
}

impl<A: Float, D: Data<Elem = A>, E: Data<Elem = A>> Regression<A, E> for ArrayBase<D, Ix1> {
    fn mean_absolute_error(&self, compare_to: &ArrayBase<E, Ix1>) -> A {
        self.sub(compare_to)
            .mapv(|x| x.abs())
            .mean()
            .unwrap_or_else(A::nan)
    }

    fn mean_squared_error(&self, compare_to: &ArrayBase<E, Ix1>) -> A {
        self.sub(compare_to)
            .mapv(|x| x * x)
            .mean()
            .unwrap_or_else(A::nan)
    }

    fn root_mean_squared_error(&self, compare_to: &ArrayBase<E, Ix1>) -> A {
        self.mean_squared_error(compare_to).sqrt()
    }

    // r2 = 1 - sum((pred_i - y_i)^2)/sum((mean_y - y_i)^2)
    // with the mean taken over `compare_to`
    fn r2(&self, compare_to: &ArrayBase<E, Ix1>) -> A {
        let mean = compare_to.mean().unwrap_or_else(A::nan);

        A::one()
            - self.sub(compare_to).mapv(|x| x * x).sum()
                / compare_to.mapv(|x| (x - mean) * (x - mean)).sum()
    }
}

/// Regression metrics of a held-out prediction, rounded to four decimals
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionReport {
    pub mse: f64,
    pub mae: f64,
    pub rmse: f64,
    pub r2: f64,
}

impl RegressionReport {
    /// Evaluate a prediction against the ground truth
    pub fn new<D: Data<Elem = f64>, E: Data<Elem = f64>>(
        prediction: &ArrayBase<D, Ix1>,
        ground_truth: &ArrayBase<E, Ix1>,
    ) -> RegressionReport {
        let r2 = prediction.r2(ground_truth);
        if !r2.is_finite() {
            log::warn!("r2 is not finite, the ground truth has no variance");
        }

        RegressionReport {
            mse: round_to(prediction.mean_squared_error(ground_truth), 4),
            mae: round_to(prediction.mean_absolute_error(ground_truth), 4),
            rmse: round_to(prediction.root_mean_squared_error(ground_truth), 4),
            r2: round_to(r2, 4),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_same() {
        let a: Array1<f64> = Array1::ones(100);

        assert_abs_diff_eq!(a.mean_absolute_error(&a), 0.0);
        assert_abs_diff_eq!(a.mean_squared_error(&a), 0.0);
        assert_abs_diff_eq!(a.root_mean_squared_error(&a), 0.0);
    }

    #[test]
    fn test_off_by_one() {
        let actual = array![1., 2., 3.];
        let predicted = array![1., 2., 4.];

        assert_abs_diff_eq!(predicted.mean_squared_error(&actual), 1. / 3., epsilon = 1e-12);
        assert_abs_diff_eq!(predicted.mean_absolute_error(&actual), 1. / 3., epsilon = 1e-12);
        assert_abs_diff_eq!(
            predicted.root_mean_squared_error(&actual),
            (1f64 / 3.).sqrt(),
            epsilon = 1e-12
        );
        // residual sum 1, total sum of squares 2
        assert_abs_diff_eq!(predicted.r2(&actual), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_r2_of_mean_prediction() {
        let actual = array![1., 2., 3., 4.];
        let predicted = Array1::from_elem(4, 2.5);

        assert_abs_diff_eq!(predicted.r2(&actual), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_ground_truth() {
        let actual: Array1<f64> = array![2., 2., 2.];

        assert!(array![1., 2., 3.].r2(&actual).is_infinite());
        assert!(actual.r2(&actual).is_nan());
    }

    #[test]
    fn test_empty_prediction() {
        let empty: Array1<f64> = Array1::zeros(0);

        assert!(empty.mean_squared_error(&empty).is_nan());
    }

    #[test]
    fn test_rounding() {
        assert_abs_diff_eq!(round_to(1. / 3., 4), 0.3333);
        assert_abs_diff_eq!(round_to(2. / 3., 4), 0.6667);
        assert_abs_diff_eq!(round_to(round_to(2. / 3., 4), 4), round_to(2. / 3., 4));
        assert!(round_to(f64::NAN, 4).is_nan());
        assert_eq!(round_to(f64::NEG_INFINITY, 4), f64::NEG_INFINITY);
    }

    #[test]
    fn test_report() {
        let report = RegressionReport::new(&array![1., 2., 4.], &array![1., 2., 3.]);

        assert_abs_diff_eq!(report.mse, 0.3333);
        assert_abs_diff_eq!(report.mae, 0.3333);
        assert_abs_diff_eq!(report.rmse, 0.5774);
        assert_abs_diff_eq!(report.r2, 0.5);
    }
}
