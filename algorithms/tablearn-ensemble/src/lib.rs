//! # Ensemble Learning Algorithms
//!
//! Ensemble methods combine the predictions of several base estimators built with a given
//! learning algorithm in order to improve generalizability / robustness over a single estimator.
//!
//! ## Random Forest
//!
//! A random forest combines the predictions of several trees (see `tablearn-trees`), each trained
//! on a bootstrap sample of the rows and a random subset of the features. Classifiers take the
//! majority vote of their trees, regressors the mean prediction.
//!
//! All randomness comes from a seeded generator, so fitting the same data with the same
//! parameters always yields the same forest.
//!
//! ## Example
//!
//! ```rust
//! use tablearn::prelude::*;
//! use tablearn_ensemble::RandomForestClassifier;
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! let mut rng = SmallRng::seed_from_u64(42);
//! let dataset = tablearn_datasets::generate::linearly_separable(50, &mut rng);
//!
//! let forest = RandomForestClassifier::params()
//!     .n_estimators(10)
//!     .fit(&dataset)
//!     .unwrap();
//!
//! let accuracy = forest
//!     .predict(&dataset)
//!     .confusion_matrix(dataset.targets())
//!     .unwrap()
//!     .accuracy();
//! assert!(accuracy > 0.9);
//! ```
//!
mod hyperparams;
mod random_forest;

pub use hyperparams::*;
pub use random_forest::*;
