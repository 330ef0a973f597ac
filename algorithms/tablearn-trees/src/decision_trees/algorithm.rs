//! Linear decision trees
//!
use log::debug;
use ndarray::{Array1, ArrayBase, Axis, Data, Ix1, Ix2};

use super::NodeIter;
use super::DecisionTreeValidParams;
use tablearn::{
    dataset::Records,
    error::Error,
    error::Result,
    traits::*,
    DatasetBase, Float, Label,
};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Rows reaching a node
///
/// Every split hands a subset of its rows to each child. Instead of copying records the children
/// share the training matrix and carry a mask of the rows they own.
pub(crate) struct RowMask {
    pub(crate) mask: Vec<bool>,
    pub(crate) nsamples: usize,
}

impl RowMask {
    /// Generates a RowMask without hidden observations
    pub(crate) fn all(nsamples: usize) -> Self {
        RowMask {
            mask: vec![true; nsamples],
            nsamples,
        }
    }

    /// Generates a RowMask where all observations are hidden
    pub(crate) fn none(nsamples: usize) -> Self {
        RowMask {
            mask: vec![false; nsamples],
            nsamples: 0,
        }
    }

    /// Sets the observation at the specified index as visible
    ///
    /// ### Panics
    ///
    /// If `idx` is out of bounds
    pub(crate) fn mark(&mut self, idx: usize) {
        self.mask[idx] = true;
        self.nsamples += 1;
    }

    /// Visible observations in ascending order
    pub(crate) fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.mask
            .iter()
            .enumerate()
            .filter(|(_, visible)| **visible)
            .map(|(idx, _)| idx)
    }

    /// Split the visible observations into those with `feature <= split_value` and the rest
    pub(crate) fn partition<F: Float>(
        &self,
        x: &ArrayBase<impl Data<Elem = F>, Ix2>,
        feature_idx: usize,
        split_value: F,
    ) -> (RowMask, RowMask) {
        let mut left = RowMask::none(self.mask.len());
        let mut right = RowMask::none(self.mask.len());

        for idx in self.indices() {
            if x[(idx, feature_idx)] <= split_value {
                left.mark(idx);
            } else {
                right.mark(idx);
            }
        }

        (left, right)
    }
}

/// Row indices of one feature, ordered by value
pub(crate) struct SortedIndex<F: Float> {
    pub(crate) sorted_values: Vec<(usize, F)>,
}

impl<F: Float> SortedIndex<F> {
    /// Sorts the values of a given feature in ascending order
    ///
    /// The sort is stable, observations with equal values keep their original order.
    pub(crate) fn of_array_column(
        x: &ArrayBase<impl Data<Elem = F>, Ix2>,
        feature_idx: usize,
    ) -> Self {
        let mut pairs: Vec<(usize, F)> = x
            .index_axis(Axis(1), feature_idx)
            .iter()
            .copied()
            .enumerate()
            .collect();
        pairs.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Greater));

        SortedIndex {
            sorted_values: pairs,
        }
    }

    /// Sort every column of a feature matrix
    pub(crate) fn of_array(x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Vec<Self> {
        (0..x.ncols())
            .map(|feature_idx| SortedIndex::of_array_column(x, feature_idx))
            .collect()
    }

    /// Visible `(index, value)` pairs in ascending order of value
    pub(crate) fn masked<'a>(&'a self, mask: &'a RowMask) -> Vec<(usize, F)> {
        self.sorted_values
            .iter()
            .filter(|(idx, _)| mask.mask[*idx])
            .copied()
            .collect()
    }
}

/// Threshold between two adjacent sorted values, `None` if they are not distinct
pub(crate) fn midpoint<F: Float>(value: F, next: F) -> Option<F> {
    if value == next {
        return None;
    }
    let split_value = (value + next) / F::cast(2.0);
    if split_value.is_nan() {
        None
    } else {
        Some(split_value)
    }
}

#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
/// A node in the decision tree
///
/// Split nodes send observations with `feature <= split_value` to the left child and all other
/// observations to the right child.
pub enum TreeNode<F, L> {
    Leaf {
        prediction: L,
        depth: usize,
    },
    Split {
        feature_idx: usize,
        split_value: F,
        /// Impurity decrease of the split, weighted by the share of training samples reaching
        /// the node
        impurity_decrease: F,
        left: Box<TreeNode<F, L>>,
        right: Box<TreeNode<F, L>>,
        depth: usize,
    },
}

impl<F: Float, L: Clone> TreeNode<F, L> {
    /// Returns true if the node has no children
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    /// Returns the depth of the node in the decision tree
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { depth, .. } | TreeNode::Split { depth, .. } => *depth,
        }
    }

    /// Returns `Some(prediction)` for leaf nodes and `None` for internal nodes.
    pub fn prediction(&self) -> Option<L> {
        match self {
            TreeNode::Leaf { prediction, .. } => Some(prediction.clone()),
            TreeNode::Split { .. } => None,
        }
    }

    /// Returns both children, first left then right, and nothing for leaf nodes
    pub fn children(&self) -> Vec<&TreeNode<F, L>> {
        match self {
            TreeNode::Leaf { .. } => Vec::new(),
            TreeNode::Split { left, right, .. } => vec![left.as_ref(), right.as_ref()],
        }
    }

    /// Return the split (feature index, value) and its impurity decrease for internal nodes
    pub fn split(&self) -> Option<(usize, F, F)> {
        match self {
            TreeNode::Leaf { .. } => None,
            TreeNode::Split {
                feature_idx,
                split_value,
                impurity_decrease,
                ..
            } => Some((*feature_idx, *split_value, *impurity_decrease)),
        }
    }

    /// Walk down to the leaf responsible for a sample
    pub(crate) fn predict_row(&self, x: &ArrayBase<impl Data<Elem = F>, Ix1>) -> L {
        let mut node = self;
        loop {
            match node {
                TreeNode::Leaf { prediction, .. } => return prediction.clone(),
                TreeNode::Split {
                    feature_idx,
                    split_value,
                    left,
                    right,
                    ..
                } => {
                    node = if x[*feature_idx] <= *split_value {
                        &**left
                    } else {
                        &**right
                    };
                }
            }
        }
    }
}

/// Gini impurity of a set of class counts
fn gini_impurity(class_counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - class_counts
        .iter()
        .map(|&count| {
            let p = count as f64 / total;
            p * p
        })
        .sum::<f64>()
}

/// The training data of a classification tree, with labels replaced by class indices
struct ClassTargets<L> {
    /// Distinct labels in order of their first appearance
    classes: Vec<L>,
    /// Class index of every observation
    indices: Vec<usize>,
}

impl<L: Label> ClassTargets<L> {
    fn new<'a>(labels: impl Iterator<Item = &'a L>) -> Self
    where
        L: 'a,
    {
        let mut classes: Vec<L> = Vec::new();
        let indices = labels
            .map(|label| match classes.iter().position(|class| class == label) {
                Some(idx) => idx,
                None => {
                    classes.push(label.clone());
                    classes.len() - 1
                }
            })
            .collect();

        ClassTargets { classes, indices }
    }

    /// Number of visible observations per class
    fn counts(&self, mask: &RowMask) -> Vec<usize> {
        let mut counts = vec![0; self.classes.len()];
        for idx in mask.indices() {
            counts[self.indices[idx]] += 1;
        }
        counts
    }

    /// Most frequent class of the visible observations
    ///
    /// Ties go to the class which appears first among the visible observations.
    fn modal_class(&self, mask: &RowMask, counts: &[usize]) -> usize {
        let mut best: Option<usize> = None;
        let mut seen = vec![false; self.classes.len()];

        for idx in mask.indices() {
            let class = self.indices[idx];
            if seen[class] {
                continue;
            }
            seen[class] = true;
            best = match best {
                Some(b) if counts[b] >= counts[class] => Some(b),
                _ => Some(class),
            };
        }

        best.unwrap_or(0)
    }
}

struct TreeBuilder<'a, F: Float, L, D: Data<Elem = F>> {
    x: &'a ArrayBase<D, Ix2>,
    targets: ClassTargets<L>,
    sorted_indices: Vec<SortedIndex<F>>,
    hyperparameters: &'a DecisionTreeValidParams<F, L>,
}

impl<'a, F: Float, L: Label, D: Data<Elem = F>> TreeBuilder<'a, F, L, D> {
    /// Recursively fits the node
    fn fit(&self, mask: &RowMask, depth: usize) -> TreeNode<F, L> {
        let class_counts = self.targets.counts(mask);
        let prediction = self.targets.modal_class(mask, &class_counts);
        let leaf = || TreeNode::Leaf {
            prediction: self.targets.classes[prediction].clone(),
            depth,
        };

        let pure = class_counts.iter().filter(|&&count| count > 0).count() <= 1;
        if pure
            || mask.nsamples < self.hyperparameters.min_samples_split()
            || self
                .hyperparameters
                .max_depth()
                .map(|max_depth| depth >= max_depth)
                .unwrap_or(false)
        {
            return leaf();
        }

        let (feature_idx, split_value, score) = match self.best_split(mask, &class_counts) {
            Some(best) => best,
            None => return leaf(),
        };

        let (left_mask, right_mask) = mask.partition(self.x, feature_idx, split_value);
        if left_mask.nsamples == 0 || right_mask.nsamples == 0 {
            return leaf();
        }

        let weight = mask.nsamples as f64 / self.x.nrows() as f64;
        let impurity_decrease =
            F::cast(weight * (gini_impurity(&class_counts, mask.nsamples) - score));

        TreeNode::Split {
            feature_idx,
            split_value,
            impurity_decrease,
            left: Box::new(self.fit(&left_mask, depth + 1)),
            right: Box::new(self.fit(&right_mask, depth + 1)),
            depth,
        }
    }

    /// Find the split with the lowest weighted Gini impurity
    ///
    /// Candidates are the midpoints between adjacent distinct values of every feature, visited
    /// feature by feature in ascending order. Only a strictly lower score replaces the best
    /// candidate, so ties keep the earliest one.
    fn best_split(&self, mask: &RowMask, parent_counts: &[usize]) -> Option<(usize, F, f64)> {
        let total = mask.nsamples;
        let mut best: Option<(usize, F, f64)> = None;

        for (feature_idx, sorted_index) in self.sorted_indices.iter().enumerate() {
            let values = sorted_index.masked(mask);

            // sweep the sorted rows from right to left, a candidate sits between distinct values
            let mut right_counts = parent_counts.to_vec();
            let mut left_counts = vec![0; parent_counts.len()];

            for i in 0..values.len().saturating_sub(1) {
                let (idx, value) = values[i];
                let class = self.targets.indices[idx];
                right_counts[class] -= 1;
                left_counts[class] += 1;

                let split_value = match midpoint(value, values[i + 1].1) {
                    Some(split_value) => split_value,
                    None => continue,
                };

                let left_total = i + 1;
                let right_total = total - left_total;
                let left_weight = left_total as f64 / total as f64;
                let right_weight = right_total as f64 / total as f64;
                let score = left_weight * gini_impurity(&left_counts, left_total)
                    + right_weight * gini_impurity(&right_counts, right_total);

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

/// A Gini decision tree classifier
///
/// ### Structure
/// Split nodes hold a feature index and a threshold, rows with `feature <= threshold` continue in
/// the left child and all others in the right child. Leaves hold the most frequent label of the
/// training rows that reached them.
///
/// ### Algorithm
///
/// The tree grows depth first from the root. For every node:
///
/// * Stop with a leaf if the node is pure, has fewer than `min_samples_split` observations or reached `max_depth`;
/// * Otherwise evaluate every midpoint between adjacent distinct values of every feature and keep the split with the
///   lowest sample-weighted Gini impurity;
/// * If no split separates the observations, the node becomes a leaf predicting the most common label in the node.
///
/// ### Predictions
///
/// A row walks from the root to a leaf by comparing its feature values with the thresholds and
/// takes the label of that leaf.
///
/// ### Example
///
/// ```rust
/// use tablearn_trees::DecisionTree;
/// use tablearn::prelude::*;
/// use ndarray::array;
///
/// let dataset = Dataset::new(array![[1.], [2.], [3.], [4.]], array![0., 0., 1., 1.]);
/// let tree = DecisionTree::params().fit(&dataset).unwrap();
/// let accuracy = tree.predict(&dataset).confusion_matrix(dataset.targets()).unwrap().accuracy();
///
/// assert_eq!(accuracy, 1.0);
/// assert_eq!(tree.root_node().split(), Some((0, 2.5, 0.5)));
///
/// ```
///
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree<F: Float, L: Label> {
    root_node: TreeNode<F, L>,
    num_features: usize,
}

impl<F: Float, L: Label + Default, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<L>>
    for DecisionTree<F, L>
{
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<L>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );

        for (row, target) in x.rows().into_iter().zip(y.iter_mut()) {
            *target = self.root_node.predict_row(&row);
        }
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<L> {
        Array1::default(x.nrows())
    }
}

impl<F: Float, L: Label, D, T> Fit<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>, Error>
    for DecisionTreeValidParams<F, L>
where
    D: Data<Elem = F>,
    T: Data<Elem = L>,
{
    type Object = DecisionTree<F, L>;

    /// Grow a tree on the records and labels of `dataset`
    ///
    /// Fails with [`Error::NotEnoughSamples`] for an empty dataset.
    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>>,
    ) -> Result<Self::Object> {
        let x = dataset.records();
        if x.nrows() != dataset.targets().len() {
            return Err(Error::MismatchedShapes(x.nrows(), dataset.targets().len()));
        }
        if x.nrows() == 0 {
            return Err(Error::NotEnoughSamples);
        }

        let builder = TreeBuilder {
            x,
            targets: ClassTargets::new(dataset.targets().iter()),
            sorted_indices: SortedIndex::of_array(x),
            hyperparameters: self,
        };
        let root_node = builder.fit(&RowMask::all(x.nrows()), 0);

        let tree = DecisionTree {
            root_node,
            num_features: dataset.nfeatures(),
        };
        debug!(
            "fitted decision tree with {} leaves and depth {}",
            tree.num_leaves(),
            tree.max_depth()
        );

        Ok(tree)
    }
}

impl<F: Float, L: Label> DecisionTree<F, L> {
    /// Create a node iterator in depth-first order
    pub fn iter_nodes(&self) -> NodeIter<F, L> {
        NodeIter::new(vec![&self.root_node])
    }

    pub fn root_node(&self) -> &TreeNode<F, L> {
        &self.root_node
    }

    /// Return the sorted indices of all features used in a split
    pub fn features(&self) -> Vec<usize> {
        features(self.iter_nodes())
    }

    /// Return the feature importance, the share of the total impurity decrease for each feature
    pub fn feature_importance(&self) -> Vec<F> {
        feature_importance(self.iter_nodes(), self.num_features)
    }

    /// Depth of the deepest leaf, zero for a single leaf
    pub fn max_depth(&self) -> usize {
        self.iter_nodes()
            .fold(0, |max, node| usize::max(max, node.depth()))
    }

    pub fn num_leaves(&self) -> usize {
        self.iter_nodes().filter(|node| node.is_leaf()).count()
    }
}

pub(crate) fn features<'a, F: Float + 'a, L: Clone + 'a>(
    nodes: impl Iterator<Item = &'a TreeNode<F, L>>,
) -> Vec<usize> {
    let mut fitted_features = nodes
        .filter_map(|node| node.split().map(|(feature_idx, _, _)| feature_idx))
        .collect::<Vec<_>>();
    fitted_features.sort_unstable();
    fitted_features.dedup();

    fitted_features
}

pub(crate) fn feature_importance<'a, F: Float + 'a, L: Clone + 'a>(
    nodes: impl Iterator<Item = &'a TreeNode<F, L>>,
    num_features: usize,
) -> Vec<F> {
    let mut impurity_decrease = vec![F::zero(); num_features];
    for (feature_idx, _, decrease) in nodes.filter_map(|node| node.split()) {
        impurity_decrease[feature_idx] += decrease;
    }

    let sum: F = impurity_decrease.iter().cloned().sum();
    if sum > F::zero() {
        impurity_decrease.into_iter().map(|x| x / sum).collect()
    } else {
        impurity_decrease
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};
    use tablearn::metrics::ToConfusionMatrix;
    use tablearn::Dataset;

    #[test]
    fn perfect_split_on_four_samples() {
        let dataset = Dataset::new(array![[1.], [2.], [3.], [4.]], array![0., 0., 1., 1.]);
        let tree = DecisionTree::params().fit(&dataset).unwrap();

        assert_eq!(tree.predict(&dataset), array![0., 0., 1., 1.]);
        assert_eq!(tree.num_leaves(), 2);
        assert_eq!(tree.max_depth(), 1);
        assert_eq!(tree.root_node().split(), Some((0, 2.5, 0.5)));
    }

    #[test]
    fn threshold_goes_left() {
        let dataset = Dataset::new(array![[1.], [3.]], array![0., 1.]);
        let tree = DecisionTree::params().fit(&dataset).unwrap();

        // the threshold itself goes left
        assert_eq!(tree.predict(&array![[2.], [2.0001]]), array![0., 1.]);
    }

    #[test]
    fn equal_scores_keep_first_feature() {
        // both features separate the labels perfectly
        let dataset = Dataset::new(
            array![[1., 10.], [2., 20.], [3., 30.], [4., 40.]],
            array![0., 0., 1., 1.],
        );
        let tree = DecisionTree::params().fit(&dataset).unwrap();

        assert_eq!(tree.features(), vec![0]);
        assert_eq!(tree.feature_importance(), vec![1., 0.]);
    }

    #[test]
    fn equal_impure_scores_keep_first_threshold() {
        // splits at 1.5 and 2.5 both leave a weighted Gini of 1/3
        let dataset = Dataset::new(array![[1.], [2.], [3.]], array![0, 1, 0]);
        let tree = DecisionTree::params().max_depth(Some(1)).fit(&dataset).unwrap();

        let (feature_idx, split_value, _) = tree.root_node().split().unwrap();
        assert_eq!(feature_idx, 0);
        assert_abs_diff_eq!(split_value, 1.5);
    }

    #[test]
    fn modal_class_ties_go_to_first_seen() {
        let dataset = Dataset::new(array![[1.], [1.], [1.], [1.]], array![2, 1, 1, 2]);
        let tree = DecisionTree::params().fit(&dataset).unwrap();

        // no split separates identical records
        assert!(tree.root_node().is_leaf());
        assert_eq!(tree.root_node().prediction(), Some(2));
    }

    #[test]
    fn respects_max_depth() {
        let records = Array2::from_shape_fn((32, 1), |(i, _)| i as f64);
        let targets = Array1::from_shape_fn(32, |i| i % 2);
        let dataset = Dataset::new(records, targets);

        let tree = DecisionTree::params()
            .max_depth(Some(3))
            .fit(&dataset)
            .unwrap();
        assert_eq!(tree.max_depth(), 3);
        assert!(tree.num_leaves() <= 8);

        let tree = DecisionTree::params().max_depth(None).fit(&dataset).unwrap();
        let accuracy = tree
            .predict(&dataset)
            .confusion_matrix(dataset.targets())
            .unwrap()
            .accuracy();
        assert_abs_diff_eq!(accuracy, 1.0);
    }

    #[test]
    fn min_samples_split_stops_early() {
        let dataset = Dataset::new(array![[1.], [2.], [3.]], array![0, 1, 0]);
        let tree = DecisionTree::params()
            .min_samples_split(4)
            .fit(&dataset)
            .unwrap();

        assert_eq!(tree.num_leaves(), 1);
        assert_eq!(tree.root_node().prediction(), Some(0));
    }

    #[test]
    fn string_labels() {
        let dataset = Dataset::new(
            array![[0., 1.], [0., 2.], [1., 1.], [1., 2.]],
            array!["cat", "cat", "dog", "dog"],
        );
        let tree = DecisionTree::params().fit(&dataset).unwrap();

        let predictions: Array1<&str> = tree.predict(&array![[0.2, 5.], [0.9, 0.]]);
        assert_eq!(predictions, array!["cat", "dog"]);
    }

    #[test]
    fn empty_dataset() {
        let dataset = Dataset::new(Array2::<f64>::zeros((0, 2)), Array1::<f64>::zeros(0));

        assert_eq!(
            DecisionTree::params().fit(&dataset).err(),
            Some(Error::NotEnoughSamples)
        );
    }
}
