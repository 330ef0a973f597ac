use std::marker::PhantomData;

use tablearn::{
    error::{Error, Result},
    Float, Label, ParamGuard,
};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::{RandomForestClassifier, RandomForestRegressor};

/// Number of features each tree may look at
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MaxFeatures {
    /// Square root of the number of features, rounded down and at least one
    Sqrt,
    /// A fixed number of features, capped at the number of available features
    Count(usize),
    /// Every tree uses all features
    All,
}

impl MaxFeatures {
    /// Resolve to a number of features for a dataset with `nfeatures` columns
    pub fn resolve(&self, nfeatures: usize) -> usize {
        let count = match self {
            MaxFeatures::Sqrt => ((nfeatures as f64).sqrt().floor() as usize).max(1),
            MaxFeatures::Count(count) => *count,
            MaxFeatures::All => nfeatures,
        };

        count.min(nfeatures)
    }
}

/// Marks forests of classification trees with labels `L`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Classifier<F, L>(PhantomData<(F, L)>);

/// Marks forests of regression trees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Regressor<F>(PhantomData<F>);

/// The set of hyperparameters of a random forest
///
/// The kind parameter `K` is either [`Classifier`] or [`Regressor`] and decides which kind of
/// forest is fitted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomForestValidParams<K> {
    n_estimators: usize,
    max_features: MaxFeatures,
    bootstrap: bool,
    seed: u64,
    max_depth: Option<usize>,
    min_samples_split: usize,

    kind: PhantomData<K>,
}

impl<K> RandomForestValidParams<K> {
    pub fn n_estimators(&self) -> usize {
        self.n_estimators
    }

    pub fn max_features(&self) -> MaxFeatures {
        self.max_features
    }

    pub fn bootstrap(&self) -> bool {
        self.bootstrap
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }
}

/// Builder for the hyperparameters of a random forest
///
/// Defaults:
/// * `n_estimators = 10`
/// * `max_features = MaxFeatures::Sqrt`
/// * `bootstrap = true`, rows are drawn with replacement
/// * `seed = 42`
/// * `max_depth = None`
/// * `min_samples_split = 3`
///
/// Features of a tree are always drawn without replacement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomForestParams<K>(RandomForestValidParams<K>);

impl<K> RandomForestParams<K> {
    pub fn new() -> Self {
        Self(RandomForestValidParams {
            n_estimators: 10,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            seed: 42,
            max_depth: None,
            min_samples_split: 3,
            kind: PhantomData,
        })
    }

    /// Sets the number of trees in the forest
    pub fn n_estimators(mut self, n_estimators: usize) -> Self {
        self.0.n_estimators = n_estimators;
        self
    }

    /// Sets the number of features drawn for every tree
    pub fn max_features(mut self, max_features: MaxFeatures) -> Self {
        self.0.max_features = max_features;
        self
    }

    /// Draw the rows of every tree with replacement, otherwise every tree sees all rows
    pub fn bootstrap(mut self, bootstrap: bool) -> Self {
        self.0.bootstrap = bootstrap;
        self
    }

    /// Sets the seed of the random number generator
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }

    /// Sets the optional depth limit of every tree
    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    /// Sets the minimum number of samples required to split a node of a tree
    pub fn min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.0.min_samples_split = min_samples_split;
        self
    }
}

impl<K> Default for RandomForestParams<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float, L: Label> RandomForestClassifier<F, L> {
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> RandomForestParams<Classifier<F, L>> {
        RandomForestParams::new()
    }
}

impl<F: Float> RandomForestRegressor<F> {
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> RandomForestParams<Regressor<F>> {
        RandomForestParams::new()
    }
}

impl<K> ParamGuard for RandomForestParams<K> {
    type Checked = RandomForestValidParams<K>;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.n_estimators == 0 {
            Err(Error::Parameters(
                "A forest needs at least one estimator".to_string(),
            ))
        } else if self.0.max_features == MaxFeatures::Count(0) {
            Err(Error::Parameters(
                "Every tree needs at least one feature".to_string(),
            ))
        } else if self.0.min_samples_split < 2 {
            Err(Error::Parameters(format!(
                "Minimum number of samples to split a node should be at least 2, but was {}",
                self.0.min_samples_split
            )))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqrt_features() {
        assert_eq!(MaxFeatures::Sqrt.resolve(1), 1);
        assert_eq!(MaxFeatures::Sqrt.resolve(8), 2);
        assert_eq!(MaxFeatures::Sqrt.resolve(9), 3);
        assert_eq!(MaxFeatures::Sqrt.resolve(0), 0);
        assert_eq!(MaxFeatures::Count(5).resolve(3), 3);
        assert_eq!(MaxFeatures::All.resolve(4), 4);
    }

    #[test]
    fn invalid_params() {
        let params = RandomForestRegressor::<f64>::params().n_estimators(0);
        assert!(params.check_ref().is_err());

        let params =
            RandomForestClassifier::<f64, usize>::params().max_features(MaxFeatures::Count(0));
        assert!(params.check_ref().is_err());

        let params = RandomForestClassifier::<f64, usize>::params().min_samples_split(1);
        assert!(params.check().is_err());
    }

    #[test]
    fn defaults() {
        let params = RandomForestClassifier::<f64, usize>::params().check_unwrap();
        assert_eq!(params.n_estimators(), 10);
        assert_eq!(params.max_features(), MaxFeatures::Sqrt);
        assert!(params.bootstrap());
        assert_eq!(params.seed(), 42);
        assert_eq!(params.max_depth(), None);
        assert_eq!(params.min_samples_split(), 3);
    }
}
