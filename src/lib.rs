//! `tablearn` is the core of a small tabular learning engine.
//!
//! It takes a rectangular [`Table`](table::Table) of loosely typed cells, profiles
//! every column, detects whether a chosen target calls for classification or
//! regression, turns the table into a numeric [`Dataset`] and evaluates predictions
//! with the usual regression and classification metrics.
//!
//! The algorithms themselves live in sibling crates of the workspace and implement
//! the [`Fit`](traits::Fit) / [`PredictInplace`](traits::PredictInplace) traits
//! defined here:
//!
//! * `tablearn-logistic`: binary logistic regression trained with gradient descent
//! * `tablearn-trees`: Gini decision trees and squared-error regression trees
//! * `tablearn-linear`: ordinary least squares
//! * `tablearn-ensemble`: random forests
//!
//! `tablearn-pipeline` ties everything together.
//!
//! ## Example
//!
//! ```rust
//! use tablearn::prelude::*;
//! use tablearn::table::{Table, Value};
//!
//! let table = Table::from_records(vec![
//!     vec![("age", Value::from(31.)), ("city", Value::from("Oslo")), ("churn", Value::from(0.))],
//!     vec![("age", Value::from(45.)), ("city", Value::from("Rome")), ("churn", Value::from(1.))],
//!     vec![("age", Value::Missing), ("city", Value::from("Oslo")), ("churn", Value::from(0.))],
//! ]);
//!
//! let mut analysis = Analysis::profile(&table).unwrap();
//! analysis.select_target(&table, "churn").unwrap();
//! assert_eq!(analysis.problem_type(), Some(ProblemType::Classification));
//!
//! let dataset = encode(&table, &analysis.feature_columns(), "churn").unwrap();
//! assert_eq!(dataset.nsamples(), 2);
//! ```

pub mod dataset;
pub mod encode;
pub mod error;
mod metrics_classification;
mod metrics_regression;
mod param_guard;
pub mod prelude;
pub mod problem;
pub mod profile;
pub mod table;
pub mod traits;

pub use dataset::{Dataset, DatasetBase, DatasetView, Float, Label};
pub use error::{Error, Result};
pub use param_guard::ParamGuard;

/// Common metrics functions for classification and regression
pub mod metrics {
    pub use crate::metrics_classification::{
        ClassificationReport, ConfusionMatrix, ToConfusionMatrix,
    };
    pub use crate::metrics_regression::{round_to, Regression, RegressionReport};
}
