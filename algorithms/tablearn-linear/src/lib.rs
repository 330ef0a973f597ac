//!
//! `tablearn-linear` provides ordinary least squares linear regression.
//!
//! ## Current state
//!
//! `tablearn-linear` currently provides two estimators which both fit a
//! [`FittedLinearRegression`]:
//! - [`SimpleLinearRegression`], the closed form solution for a single feature
//! - [`LinearRegression`], least squares on any number of features, solved by a QR decomposition
//!
//! ```rust
//! use tablearn::prelude::*;
//! use tablearn_linear::{LinearRegression, SimpleLinearRegression};
//! use ndarray::array;
//!
//! let dataset = Dataset::new(array![[0.], [1.], [2.]], array![1., 3., 5.]);
//!
//! let simple = SimpleLinearRegression::default().fit(&dataset).unwrap();
//! let ols = LinearRegression::default().fit(&dataset).unwrap();
//!
//! assert!((simple.params()[0] - 2.).abs() < 1e-9);
//! assert!((ols.intercept() - simple.intercept()).abs() < 1e-9);
//! ```

mod error;
mod ols;
mod simple;

pub use error::*;
pub use ols::*;
pub use simple::*;
