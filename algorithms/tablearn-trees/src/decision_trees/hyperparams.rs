use tablearn::{
    error::{Error, Result},
    Float, Label, ParamGuard,
};
use std::marker::PhantomData;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::{DecisionTree, RegressionTree};

fn check_min_samples_split(min_samples_split: usize) -> Result<()> {
    if min_samples_split < 2 {
        Err(Error::Parameters(format!(
            "Minimum number of samples to split a node should be at least 2, but was {}",
            min_samples_split
        )))
    } else {
        Ok(())
    }
}

/// Checked growth limits of a [`DecisionTree`]
///
/// ### Example
///
/// ```rust
/// use tablearn_trees::DecisionTree;
/// use tablearn::prelude::*;
/// use ndarray::array;
///
/// let params = DecisionTree::params().max_depth(Some(5)).min_samples_split(4);
///
/// let dataset = Dataset::new(
///     array![[1., 0.], [2., 0.], [3., 1.], [4., 1.], [5., 1.]],
///     array![0, 0, 1, 1, 1],
/// );
/// let tree = params.fit(&dataset).unwrap();
/// let accuracy = tree.predict(&dataset).confusion_matrix(dataset.targets()).unwrap().accuracy();
/// assert!(accuracy > 0.99);
/// ```
///
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecisionTreeValidParams<F, L> {
    max_depth: Option<usize>,
    min_samples_split: usize,

    marker: PhantomData<(F, L)>,
}

impl<F: Float, L> DecisionTreeValidParams<F, L> {
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecisionTreeParams<F, L>(DecisionTreeValidParams<F, L>);

impl<F: Float, L: Label> DecisionTreeParams<F, L> {
    pub fn new() -> Self {
        Self(DecisionTreeValidParams {
            max_depth: Some(10),
            min_samples_split: 2,
            marker: PhantomData,
        })
    }

    /// Sets the optional limit to the depth of the decision tree
    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    /// Sets the minimum number of samples required to split a node.
    pub fn min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.0.min_samples_split = min_samples_split;
        self
    }
}

impl<F: Float, L: Label> Default for DecisionTreeParams<F, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float, L: Label> DecisionTree<F, L> {
    /// Growth limits with `max_depth = Some(10)` and `min_samples_split = 2`
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> DecisionTreeParams<F, L> {
        DecisionTreeParams::new()
    }
}

impl<F: Float, L> ParamGuard for DecisionTreeParams<F, L> {
    type Checked = DecisionTreeValidParams<F, L>;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        check_min_samples_split(self.0.min_samples_split)?;
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// The set of hyperparameters that can be specified for fitting a
/// [regression tree](struct.RegressionTree.html).
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegressionTreeValidParams<F> {
    max_depth: Option<usize>,
    min_samples_split: usize,

    marker: PhantomData<F>,
}

impl<F: Float> RegressionTreeValidParams<F> {
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn min_samples_split(&self) -> usize {
        self.min_samples_split
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegressionTreeParams<F>(RegressionTreeValidParams<F>);

impl<F: Float> RegressionTreeParams<F> {
    pub fn new() -> Self {
        Self(RegressionTreeValidParams {
            max_depth: None,
            min_samples_split: 2,
            marker: PhantomData,
        })
    }

    /// Sets the optional limit to the depth of the regression tree
    pub fn max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.0.max_depth = max_depth;
        self
    }

    /// Sets the minimum number of samples required to split a node.
    pub fn min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.0.min_samples_split = min_samples_split;
        self
    }
}

impl<F: Float> Default for RegressionTreeParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> RegressionTree<F> {
    /// Unlimited depth, nodes with two or more rows are split
    #[allow(clippy::new_ret_no_self)]
    pub fn params() -> RegressionTreeParams<F> {
        RegressionTreeParams::new()
    }
}

impl<F: Float> ParamGuard for RegressionTreeParams<F> {
    type Checked = RegressionTreeValidParams<F>;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        check_min_samples_split(self.0.min_samples_split)?;
        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
