//! Random forests
//!
//! An ensemble of trees trained on bootstrapped, feature-subsampled slices of the data.
use log::debug;
use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2};
use rand::{rngs::StdRng, seq::index::sample, Rng, SeedableRng};

use tablearn::{
    dataset::Records,
    error::{Error, Result},
    traits::*,
    Dataset, DatasetBase, Float, Label,
};
use tablearn_trees::{DecisionTree, RegressionTree};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::{Classifier, RandomForestValidParams, Regressor};

/// Rows and features a single tree is trained on
struct Draw {
    rows: Vec<usize>,
    features: Vec<usize>,
}

impl<K> RandomForestValidParams<K> {
    /// Draw the training slices of every tree from one seeded generator
    fn draws(&self, nsamples: usize, nfeatures: usize) -> Vec<Draw> {
        let mut rng = StdRng::seed_from_u64(self.seed());
        let nselected = self.max_features().resolve(nfeatures);

        (0..self.n_estimators())
            .map(|_| {
                let rows = if self.bootstrap() {
                    (0..nsamples).map(|_| rng.gen_range(0..nsamples)).collect()
                } else {
                    (0..nsamples).collect()
                };
                let mut features = sample(&mut rng, nfeatures, nselected).into_vec();
                features.sort_unstable();

                Draw { rows, features }
            })
            .collect()
    }
}

/// Check the shape of a dataset and return its dimensions
fn validate<D: Data, T: Data>(
    x: &ArrayBase<D, Ix2>,
    y: &ArrayBase<T, Ix1>,
) -> Result<(usize, usize)> {
    if x.nrows() != y.len() {
        return Err(Error::MismatchedShapes(x.nrows(), y.len()));
    }
    if x.nrows() == 0 {
        return Err(Error::NotEnoughSamples);
    }
    Ok(x.dim())
}

/// Slice the training set of a single tree
fn subset<F: Float, T: Clone>(
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    y: &ArrayBase<impl Data<Elem = T>, Ix1>,
    draw: &Draw,
) -> Dataset<F, T> {
    let records = x.select(Axis(0), &draw.rows).select(Axis(1), &draw.features);
    let targets = y.select(Axis(0), &draw.rows);

    Dataset::new(records, targets)
}

/// Sum the importance of every tree at the original feature positions and normalize
fn forest_importance<F: Float>(
    nfeatures: usize,
    trees: impl Iterator<Item = (Vec<F>, Vec<usize>)>,
) -> Vec<F> {
    let mut importance = vec![F::zero(); nfeatures];
    for (tree_importance, features) in trees {
        for (value, idx) in tree_importance.into_iter().zip(features) {
            importance[idx] += value;
        }
    }

    let sum: F = importance.iter().cloned().sum();
    if sum > F::zero() {
        importance.into_iter().map(|x| x / sum).collect()
    } else {
        importance
    }
}

/// A fitted random forest classifier
///
/// Every row is predicted by the majority vote of the trees. Ties go to the label which was
/// voted for first.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestClassifier<F: Float, L: Label> {
    trees: Vec<DecisionTree<F, L>>,
    feature_indices: Vec<Vec<usize>>,
    num_features: usize,
}

impl<F: Float, L: Label, D, T> Fit<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>, Error>
    for RandomForestValidParams<Classifier<F, L>>
where
    D: Data<Elem = F>,
    T: Data<Elem = L>,
{
    type Object = RandomForestClassifier<F, L>;

    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>>,
    ) -> Result<Self::Object> {
        let (x, y) = (dataset.records(), dataset.targets());
        let (nsamples, nfeatures) = validate(x, y)?;

        let tree_params = DecisionTree::params()
            .max_depth(self.max_depth())
            .min_samples_split(self.min_samples_split());

        let draws = self.draws(nsamples, nfeatures);
        let trees = draws
            .iter()
            .map(|draw| tree_params.fit(&subset(x, y, draw)))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "fitted random forest classifier with {} trees on {} features each",
            trees.len(),
            self.max_features().resolve(nfeatures)
        );

        Ok(RandomForestClassifier {
            trees,
            feature_indices: draws.into_iter().map(|draw| draw.features).collect(),
            num_features: dataset.nfeatures(),
        })
    }
}

impl<F: Float, L: Label> RandomForestClassifier<F, L> {
    pub fn trees(&self) -> &[DecisionTree<F, L>] {
        &self.trees
    }

    /// Indices of the features each tree was trained on
    pub fn feature_indices(&self) -> &[Vec<usize>] {
        &self.feature_indices
    }

    /// Impurity decrease of every feature summed over all trees, normalized to one
    pub fn feature_importance(&self) -> Vec<F> {
        forest_importance(
            self.num_features,
            self.trees
                .iter()
                .zip(&self.feature_indices)
                .map(|(tree, features)| (tree.feature_importance(), features.clone())),
        )
    }
}

impl<F: Float, L: Label + Default, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<L>>
    for RandomForestClassifier<F, L>
{
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<L>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );

        // votes per row, labels in order of their first vote
        let mut votes: Vec<Vec<(L, usize)>> = vec![Vec::new(); x.nrows()];
        for (tree, features) in self.trees.iter().zip(&self.feature_indices) {
            let predictions: Array1<L> = tree.predict(&x.select(Axis(1), features));

            for (row_votes, label) in votes.iter_mut().zip(predictions.iter()) {
                match row_votes.iter_mut().find(|(voted, _)| voted == label) {
                    Some((_, count)) => *count += 1,
                    None => row_votes.push((label.clone(), 1)),
                }
            }
        }

        for (target, row_votes) in y.iter_mut().zip(votes) {
            let mut winner: Option<(L, usize)> = None;
            for (label, count) in row_votes {
                if winner.as_ref().map(|(_, best)| count > *best).unwrap_or(true) {
                    winner = Some((label, count));
                }
            }
            if let Some((label, _)) = winner {
                *target = label;
            }
        }
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<L> {
        Array1::default(x.nrows())
    }
}

/// A fitted random forest regressor
///
/// Every row is predicted by the mean prediction of the trees.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestRegressor<F: Float> {
    trees: Vec<RegressionTree<F>>,
    feature_indices: Vec<Vec<usize>>,
    num_features: usize,
}

impl<F: Float, D, T> Fit<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>, Error>
    for RandomForestValidParams<Regressor<F>>
where
    D: Data<Elem = F>,
    T: Data<Elem = F>,
{
    type Object = RandomForestRegressor<F>;

    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>>,
    ) -> Result<Self::Object> {
        let (x, y) = (dataset.records(), dataset.targets());
        let (nsamples, nfeatures) = validate(x, y)?;

        let tree_params = RegressionTree::params()
            .max_depth(self.max_depth())
            .min_samples_split(self.min_samples_split());

        let draws = self.draws(nsamples, nfeatures);
        let trees = draws
            .iter()
            .map(|draw| tree_params.fit(&subset(x, y, draw)))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "fitted random forest regressor with {} trees on {} features each",
            trees.len(),
            self.max_features().resolve(nfeatures)
        );

        Ok(RandomForestRegressor {
            trees,
            feature_indices: draws.into_iter().map(|draw| draw.features).collect(),
            num_features: dataset.nfeatures(),
        })
    }
}

impl<F: Float> RandomForestRegressor<F> {
    pub fn trees(&self) -> &[RegressionTree<F>] {
        &self.trees
    }

    /// Indices of the features each tree was trained on
    pub fn feature_indices(&self) -> &[Vec<usize>] {
        &self.feature_indices
    }

    /// Variance decrease of every feature summed over all trees, normalized to one
    pub fn feature_importance(&self) -> Vec<F> {
        forest_importance(
            self.num_features,
            self.trees
                .iter()
                .zip(&self.feature_indices)
                .map(|(tree, features)| (tree.feature_importance(), features.clone())),
        )
    }
}

impl<F: Float, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<F>>
    for RandomForestRegressor<F>
{
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<F>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );

        let mut sum = Array1::zeros(x.nrows());
        for (tree, features) in self.trees.iter().zip(&self.feature_indices) {
            let selected: Array2<F> = x.select(Axis(1), features);
            let predictions: Array1<F> = tree.predict(&selected);
            sum += &predictions;
        }

        *y = sum / F::cast(self.trees.len());
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        Array1::zeros(x.nrows())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MaxFeatures;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::rngs::SmallRng;

    #[test]
    fn same_seed_same_forest() {
        let mut rng = SmallRng::seed_from_u64(3);
        let dataset =
            tablearn_datasets::generate::linear(60, &[1., -1., 2., 0.5], 0., 0.1, &mut rng);

        let first = RandomForestRegressor::params().fit(&dataset).unwrap();
        let second = RandomForestRegressor::params().fit(&dataset).unwrap();
        assert_eq!(first, second);

        let other = RandomForestRegressor::params().seed(7).fit(&dataset).unwrap();
        assert_ne!(first.feature_indices(), other.feature_indices());
    }

    #[test]
    fn features_drawn_without_replacement() {
        let mut rng = SmallRng::seed_from_u64(3);
        let dataset = tablearn_datasets::generate::linear(20, &[1.; 9], 0., 0.1, &mut rng);

        let forest = RandomForestRegressor::params().fit(&dataset).unwrap();
        assert_eq!(forest.trees().len(), 10);
        for features in forest.feature_indices() {
            assert_eq!(features.len(), 3);
            assert!(features.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn regressor_averages_trees() {
        let dataset = Dataset::new(array![[1.], [2.], [3.], [4.]], array![1., 1., 5., 5.]);
        let forest = RandomForestRegressor::params()
            .bootstrap(false)
            .n_estimators(3)
            .fit(&dataset)
            .unwrap();

        // without bootstrap every tree is the same
        let predictions: Array1<f64> = forest.predict(&dataset);
        assert_abs_diff_eq!(predictions, array![1., 1., 5., 5.], epsilon = 1e-12);
    }

    #[test]
    fn classifier_votes() {
        let dataset = Dataset::new(
            array![[0., 5.], [1., 3.], [2., 4.], [8., 1.], [9., 2.], [10., 0.]],
            array!["low", "low", "low", "high", "high", "high"],
        );
        let forest = RandomForestClassifier::params()
            .max_features(MaxFeatures::All)
            .n_estimators(5)
            .fit(&dataset)
            .unwrap();

        let predictions = forest.predict(&array![[0.5, 4.], [9.5, 0.5]]);
        assert_eq!(predictions, array!["low", "high"]);
        assert_abs_diff_eq!(forest.feature_importance().iter().sum::<f64>(), 1., epsilon = 1e-12);
    }

    #[test]
    fn rejects_empty_data() {
        let dataset = Dataset::new(Array2::<f64>::zeros((0, 2)), Array1::<usize>::zeros(0));
        let res = RandomForestClassifier::params().fit(&dataset);
        assert!(matches!(res, Err(Error::NotEnoughSamples)));
    }
}
