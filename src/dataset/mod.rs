//! Datasets
//!
//! This module implements the dataset struct handed to the algorithms and the helper traits
//! describing its records, floats and labels.
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, NdFloat};
use num_traits::{FromPrimitive, NumCast};

use std::fmt;
use std::iter::Sum;

mod impl_dataset;
mod impl_records;

/// Floating point numbers
///
/// This trait bound multiplexes to the most common assumption of floating point number and
/// implement them for 32bit and 64bit floating points. They are used in records of a dataset and, for
/// regression task, in the targets as well.
pub trait Float: NdFloat + FromPrimitive + Default + Sum {
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f32 {}

impl Float for f64 {}

/// Discrete labels
///
/// Labels only need to be comparable and clonable. Encoded tabular targets are floating point
/// numbers, which is why `Eq` and `Hash` are not required.
pub trait Label: PartialEq + Clone + fmt::Debug {}

impl Label for bool {}
impl Label for usize {}
impl Label for i32 {}
impl Label for i64 {}
impl Label for f32 {}
impl Label for f64 {}
impl Label for String {}
impl Label for &str {}

/// DatasetBase
///
/// This is the fundamental structure of a dataset. It contains a number of records about the data
/// and the targets belonging to them, together with optional feature names.
///
/// # Fields
///
/// * `records`: a two-dimensional matrix with dimensionality (nsamples, nfeatures)
/// * `targets`: a one-dimensional array with one target per record
/// * `feature_names`: optional descriptive feature names with dimensionality (nfeatures)
pub struct DatasetBase<R, T>
where
    R: Records,
{
    pub records: R,
    pub targets: T,

    feature_names: Vec<String>,
}

/// Dataset
///
/// The most commonly used typed of dataset. It contains a number of records stored as an
/// `Array2` and a single target per record stored as an `Array1`.
pub type Dataset<D, T> = DatasetBase<Array2<D>, Array1<T>>;

/// DatasetView
///
/// A read only view of a Dataset
pub type DatasetView<'a, D, T> = DatasetBase<ArrayView2<'a, D>, ArrayView1<'a, T>>;

/// Record trait
pub trait Records: Sized {
    type Elem;

    fn nsamples(&self) -> usize;
    fn nfeatures(&self) -> usize;
}
