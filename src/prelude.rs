//! tablearn prelude.
//!
//! This module contains the most used types, type aliases, traits and
//! functions that you can import easily as a group.
//!

#[doc(no_inline)]
pub use crate::error::{Error, Result};

#[doc(no_inline)]
pub use crate::traits::*;

#[doc(no_inline)]
pub use crate::dataset::{Dataset, DatasetBase, DatasetView, Float, Label, Records};

#[doc(no_inline)]
pub use crate::param_guard::ParamGuard;

#[doc(no_inline)]
pub use crate::table::{Row, Table, Value};

#[doc(no_inline)]
pub use crate::profile::{Analysis, ColumnProfile, ColumnStatistics, ColumnType};

#[doc(no_inline)]
pub use crate::problem::{ClassBalance, ProblemType};

#[doc(no_inline)]
pub use crate::encode::encode;

#[doc(no_inline)]
pub use crate::metrics_classification::{ClassificationReport, ConfusionMatrix, ToConfusionMatrix};

#[doc(no_inline)]
pub use crate::metrics_regression::{round_to, Regression, RegressionReport};
