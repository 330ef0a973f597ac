//! Common metrics for performance evaluation of classifier
//!
//! Scoring is essential for classification tasks. This module implements the confusion matrix
//! and the scores derived from it: accuracy for any number of classes, precision, recall and
//! F1-score for binary problems.
use std::cmp::Ordering;
use std::fmt;

use ndarray::prelude::*;
use ndarray::Data;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metrics_regression::round_to;
use crate::Label;

/// Confusion matrix for multi-label evaluation
///
/// A confusion matrix shows predictions in a matrix, where rows correspond to target and columns
/// to predicted. The diagonal entries are correct predictions. Classes are the sorted union of
/// the labels found in target and prediction.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, PartialEq)]
pub struct ConfusionMatrix<A> {
    matrix: Array2<usize>,
    members: Array1<A>,
}

impl<A> ConfusionMatrix<A> {
    /// Number of samples per (target, predicted) pair
    pub fn matrix(&self) -> &Array2<usize> {
        &self.matrix
    }

    /// Sorted class labels indexing rows and columns
    pub fn labels(&self) -> &Array1<A> {
        &self.members
    }

    /// Number of evaluated samples
    pub fn nsamples(&self) -> usize {
        self.matrix.sum()
    }

    /// Return mean accuracy
    ///
    /// `NaN` for an empty matrix.
    pub fn accuracy(&self) -> f64 {
        self.matrix.diag().sum() as f64 / self.matrix.sum() as f64
    }

    /// Precision, recall and F1-score of the larger label, for exactly two classes
    ///
    /// Returns `None` for any other number of classes. Scores with a zero denominator are zero.
    pub fn binary_scores(&self) -> Option<(f64, f64, f64)> {
        if self.members.len() != 2 {
            return None;
        }

        let tp = self.matrix[(1, 1)] as f64;
        let fp = self.matrix[(0, 1)] as f64;
        let fn_ = self.matrix[(1, 0)] as f64;

        let precision = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };
        let recall = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Some((precision, recall, f1))
    }
}

/// Print a confusion matrix
impl<A: fmt::Debug> fmt::Debug for ConfusionMatrix<A> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "classes: {:?}", self.members.as_slice().unwrap_or(&[]))?;

        let len = self.matrix.len_of(Axis(0));
        for _ in 0..len * 4 + 1 {
            write!(f, "-")?;
        }
        writeln!(f)?;

        for i in 0..len {
            write!(f, "| ")?;

            for j in 0..len {
                write!(f, "{} | ", self.matrix[(i, j)])?;
            }
            writeln!(f)?;
        }

        for _ in 0..len * 4 + 1 {
            write!(f, "-")?;
        }

        Ok(())
    }
}

/// Classification functions
///
/// Contains only routine for Confusion Matrix, as all other current metrices can be derived from
/// the entries in the matrix.
pub trait ToConfusionMatrix<A, T> {
    fn confusion_matrix(&self, ground_truth: T) -> Result<ConfusionMatrix<A>>;
}

/// Returns true for labels without an order, such as NaN
#[allow(clippy::eq_op)]
fn is_unordered<A: PartialEq>(label: &A) -> bool {
    label != label
}

/// Label equality where all unordered labels form a single class
fn same_label<A: PartialEq>(a: &A, b: &A) -> bool {
    a == b || (is_unordered(a) && is_unordered(b))
}

/// Ascending order with unordered labels last
fn compare_labels<A: PartialOrd>(a: &A, b: &A) -> Ordering {
    a.partial_cmp(b)
        .unwrap_or_else(|| is_unordered(a).cmp(&is_unordered(b)))
}

impl<A, C, D> ToConfusionMatrix<A, &ArrayBase<D, Ix1>> for ArrayBase<C, Ix1>
where
    A: Label + PartialOrd,
    C: Data<Elem = A>,
    D: Data<Elem = A>,
{
    fn confusion_matrix(&self, ground_truth: &ArrayBase<D, Ix1>) -> Result<ConfusionMatrix<A>> {
        if self.len() != ground_truth.len() {
            return Err(Error::MismatchedShapes(ground_truth.len(), self.len()));
        }

        let mut classes: Vec<A> = Vec::new();
        for label in ground_truth.iter().chain(self.iter()) {
            if !classes.iter().any(|class| same_label(class, label)) {
                classes.push(label.clone());
            }
        }
        classes.sort_by(compare_labels);

        let index_of = |label: &A| classes.iter().position(|class| same_label(class, label));

        // count each index tuple in the confusion matrix
        let mut matrix = Array2::zeros((classes.len(), classes.len()));
        for (actual, predicted) in ground_truth.iter().zip(self.iter()) {
            if let (Some(i), Some(j)) = (index_of(actual), index_of(predicted)) {
                matrix[(i, j)] += 1;
            }
        }

        Ok(ConfusionMatrix {
            matrix,
            members: Array1::from(classes),
        })
    }
}

/// Classification metrics of a held-out prediction, rounded to four decimals
///
/// Precision, recall and F1-score are only defined for binary problems, with the numerically
/// larger label as the positive class. They are reported as zero otherwise.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl ClassificationReport {
    /// Derive the report from a confusion matrix
    pub fn new<A>(cm: &ConfusionMatrix<A>) -> ClassificationReport {
        let (precision, recall, f1) = cm.binary_scores().unwrap_or((0.0, 0.0, 0.0));

        ClassificationReport {
            accuracy: round_to(cm.accuracy(), 4),
            precision: round_to(precision, 4),
            recall: round_to(recall, 4),
            f1: round_to(f1, 4),
        }
    }
}
