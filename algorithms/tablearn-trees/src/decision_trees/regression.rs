//! Regression trees
//!
//! Same structure as the classification tree, but leaves predict the mean target of their
//! observations and splits minimize the sample-weighted variance of the two children.
use log::debug;
use ndarray::{Array1, ArrayBase, Data, Ix1, Ix2};

use super::algorithm::{feature_importance, features, midpoint, RowMask, SortedIndex};
use super::{NodeIter, RegressionTreeValidParams, TreeNode};
use tablearn::{
    dataset::Records,
    error::{Error, Result},
    traits::*,
    DatasetBase, Float,
};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Sum of squared deviations from the mean, computed from running sums
fn squared_error<F: Float>(sum: F, sum_sq: F, count: usize) -> F {
    if count == 0 {
        F::zero()
    } else {
        sum_sq - sum * sum / F::cast(count)
    }
}

struct TreeBuilder<'a, F: Float, D: Data<Elem = F>, T: Data<Elem = F>> {
    x: &'a ArrayBase<D, Ix2>,
    y: &'a ArrayBase<T, Ix1>,
    sorted_indices: Vec<SortedIndex<F>>,
    hyperparameters: &'a RegressionTreeValidParams<F>,
}

impl<'a, F: Float, D: Data<Elem = F>, T: Data<Elem = F>> TreeBuilder<'a, F, D, T> {
    fn fit(&self, mask: &RowMask, depth: usize) -> TreeNode<F, F> {
        let (sum, sum_sq) = mask.indices().fold((F::zero(), F::zero()), |(s, sq), idx| {
            (s + self.y[idx], sq + self.y[idx] * self.y[idx])
        });
        let leaf = || TreeNode::Leaf {
            prediction: sum / F::cast(mask.nsamples),
            depth,
        };

        let first = mask.indices().next().map(|idx| self.y[idx]);
        let constant = mask.indices().all(|idx| Some(self.y[idx]) == first);
        if constant
            || mask.nsamples < self.hyperparameters.min_samples_split()
            || self
                .hyperparameters
                .max_depth()
                .map(|max_depth| depth >= max_depth)
                .unwrap_or(false)
        {
            return leaf();
        }

        let (feature_idx, split_value, score) = match self.best_split(mask, sum, sum_sq) {
            Some(best) => best,
            None => return leaf(),
        };

        let (left_mask, right_mask) = mask.partition(self.x, feature_idx, split_value);
        if left_mask.nsamples == 0 || right_mask.nsamples == 0 {
            return leaf();
        }

        let n = F::cast(mask.nsamples);
        let parent_score = squared_error(sum, sum_sq, mask.nsamples) / n;
        let weight = n / F::cast(self.x.nrows());

        TreeNode::Split {
            feature_idx,
            split_value,
            impurity_decrease: weight * (parent_score - score),
            left: Box::new(self.fit(&left_mask, depth + 1)),
            right: Box::new(self.fit(&right_mask, depth + 1)),
            depth,
        }
    }

    /// Find the split with the lowest weighted variance, ties keep the earliest candidate
    fn best_split(&self, mask: &RowMask, sum: F, sum_sq: F) -> Option<(usize, F, F)> {
        let total = mask.nsamples;
        let mut best: Option<(usize, F, F)> = None;

        for (feature_idx, sorted_index) in self.sorted_indices.iter().enumerate() {
            let values = sorted_index.masked(mask);
            let (mut left_sum, mut left_sum_sq) = (F::zero(), F::zero());

            for i in 0..values.len().saturating_sub(1) {
                let (idx, value) = values[i];
                left_sum += self.y[idx];
                left_sum_sq += self.y[idx] * self.y[idx];

                let split_value = match midpoint(value, values[i + 1].1) {
                    Some(split_value) => split_value,
                    None => continue,
                };

                let left_total = i + 1;
                let score = (squared_error(left_sum, left_sum_sq, left_total)
                    + squared_error(sum - left_sum, sum_sq - left_sum_sq, total - left_total))
                    / F::cast(total);

                best = match best.take() {
                    None => Some((feature_idx, split_value, score)),
                    Some((_, _, best_score)) if score < best_score => {
                        Some((feature_idx, split_value, score))
                    }
                    x => x,
                };
            }
        }

        best
    }
}

/// A fitted regression tree
///
/// Leaves predict the mean target of the training observations reaching them. Used as the base
/// learner of random forest regressors.
///
/// ```rust
/// use tablearn_trees::RegressionTree;
/// use tablearn::prelude::*;
/// use ndarray::array;
///
/// let dataset = Dataset::new(array![[1.], [2.], [10.], [11.]], array![1., 3., 20., 22.]);
/// let tree = RegressionTree::params().max_depth(Some(1)).fit(&dataset).unwrap();
///
/// assert_eq!(tree.predict(&array![[0.], [12.]]), array![2., 21.]);
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree<F: Float> {
    root_node: TreeNode<F, F>,
    num_features: usize,
}

impl<F: Float, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<F>>
    for RegressionTree<F>
{
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<F>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "records and output targets differ in length"
        );

        for (row, target) in x.rows().into_iter().zip(y.iter_mut()) {
            *target = self.root_node.predict_row(&row);
        }
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        Array1::zeros(x.nrows())
    }
}

impl<F: Float, D, T> Fit<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>, Error>
    for RegressionTreeValidParams<F>
where
    D: Data<Elem = F>,
    T: Data<Elem = F>,
{
    type Object = RegressionTree<F>;

    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>>,
    ) -> Result<Self::Object> {
        let (x, y) = (dataset.records(), dataset.targets());
        if x.nrows() != y.len() {
            return Err(Error::MismatchedShapes(x.nrows(), y.len()));
        }
        if x.nrows() == 0 {
            return Err(Error::NotEnoughSamples);
        }

        let builder = TreeBuilder {
            x,
            y,
            sorted_indices: SortedIndex::of_array(x),
            hyperparameters: self,
        };
        let root_node = builder.fit(&RowMask::all(x.nrows()), 0);

        let tree = RegressionTree {
            root_node,
            num_features: dataset.nfeatures(),
        };
        debug!(
            "fitted regression tree with {} leaves and depth {}",
            tree.num_leaves(),
            tree.max_depth()
        );

        Ok(tree)
    }
}

impl<F: Float> RegressionTree<F> {
    /// Create a node iterator in depth-first order
    pub fn iter_nodes(&self) -> NodeIter<F, F> {
        NodeIter::new(vec![&self.root_node])
    }

    pub fn root_node(&self) -> &TreeNode<F, F> {
        &self.root_node
    }

    /// Return the sorted indices of all features used in a split
    pub fn features(&self) -> Vec<usize> {
        features(self.iter_nodes())
    }

    /// Return the feature importance, the share of the total variance decrease for each feature
    pub fn feature_importance(&self) -> Vec<F> {
        feature_importance(self.iter_nodes(), self.num_features)
    }

    pub fn max_depth(&self) -> usize {
        self.iter_nodes()
            .fold(0, |max, node| usize::max(max, node.depth()))
    }

    pub fn num_leaves(&self) -> usize {
        self.iter_nodes().filter(|node| node.is_leaf()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use tablearn::Dataset;

    #[test]
    fn splits_at_largest_gap() {
        let dataset = Dataset::new(array![[1.], [2.], [10.], [11.]], array![1., 3., 20., 22.]);
        let tree = RegressionTree::params()
            .max_depth(Some(1))
            .fit(&dataset)
            .unwrap();

        let (feature_idx, split_value, _) = tree.root_node().split().unwrap();
        assert_eq!(feature_idx, 0);
        assert_abs_diff_eq!(split_value, 6.);
        assert_eq!(tree.predict(&dataset), array![2., 2., 21., 21.]);
    }

    #[test]
    fn fully_grown_tree_interpolates() {
        let dataset = Dataset::new(array![[1.], [2.], [3.], [4.]], array![5., -1., 7., 0.5]);
        let tree = RegressionTree::params().fit(&dataset).unwrap();

        assert_eq!(tree.predict(&dataset), dataset.targets().clone());
        assert_eq!(tree.num_leaves(), 4);
    }

    #[test]
    fn constant_targets_make_a_leaf() {
        let dataset = Dataset::new(array![[1.], [2.], [3.]], array![4., 4., 4.]);
        let tree = RegressionTree::params().fit(&dataset).unwrap();

        assert_eq!(tree.root_node().prediction(), Some(4.));
        assert_eq!(tree.feature_importance(), vec![0.]);
    }

    #[test]
    fn picks_informative_feature() {
        let dataset = Dataset::new(
            array![[3., 1.], [1., 2.], [4., 3.], [2., 4.]],
            array![0., 0., 10., 10.],
        );
        let tree = RegressionTree::params().fit(&dataset).unwrap();

        assert_eq!(tree.features(), vec![1]);
        assert_abs_diff_eq!(tree.feature_importance()[1], 1.);
    }
}
