use super::{Dataset, DatasetBase, DatasetView, Records};
use ndarray::{Array1, Array2, Axis};
use rand::{seq::SliceRandom, Rng};

/// Implementation without constraints on records and targets
///
/// This implementation block provides methods for the creation and mutation of datasets. This
/// includes swapping the targets and accessing the feature names.
impl<R: Records, T> DatasetBase<R, T> {
    /// Create a new dataset from records and targets
    ///
    /// # Example
    ///
    /// ```ignore
    /// let dataset = Dataset::new(records, targets);
    /// ```
    pub fn new(records: R, targets: T) -> DatasetBase<R, T> {
        DatasetBase {
            records,
            targets,
            feature_names: Vec::new(),
        }
    }

    /// Returns reference to targets
    pub fn targets(&self) -> &T {
        &self.targets
    }

    /// Returns reference to records
    pub fn records(&self) -> &R {
        &self.records
    }

    /// Updates the feature names of a dataset
    pub fn with_feature_names<I: Into<String>>(mut self, names: Vec<I>) -> DatasetBase<R, T> {
        self.feature_names = names.into_iter().map(|x| x.into()).collect();

        self
    }

    /// Returns feature names
    ///
    /// A feature name gives a human-readable string describing the purpose of a single feature.
    /// This allow the reader to understand its purpose while analysing results, for example
    /// when printing the splits of a decision tree.
    pub fn feature_names(&self) -> Vec<String> {
        if !self.feature_names.is_empty() {
            self.feature_names.clone()
        } else {
            (0..self.records.nfeatures())
                .map(|idx| format!("feature-{}", idx))
                .collect()
        }
    }

    /// Return the number of samples in the dataset
    pub fn nsamples(&self) -> usize {
        self.records.nsamples()
    }

    /// Return the number of features in the dataset
    pub fn nfeatures(&self) -> usize {
        self.records.nfeatures()
    }
}

impl<F: Clone, L: Clone> Dataset<F, L> {
    /// Creates a view of a dataset
    pub fn view(&self) -> DatasetView<'_, F, L> {
        DatasetBase::new(self.records.view(), self.targets.view())
            .with_feature_names(self.feature_names.clone())
    }

    /// Split dataset into two disjoint chunks
    ///
    /// The first `floor(nsamples * ratio)` samples go into the first chunk, the remaining ones
    /// into the second. The order of samples is preserved, so splitting the same dataset twice
    /// always yields the same chunks.
    pub fn split_with_ratio(self, ratio: f64) -> (Dataset<F, L>, Dataset<F, L>) {
        let nsamples = self.nsamples();
        let n = ((nsamples as f64 * ratio).floor() as usize).min(nsamples);

        let (first_records, second_records) = self.records.view().split_at(Axis(0), n);
        let (first_targets, second_targets) = self.targets.view().split_at(Axis(0), n);

        let first = DatasetBase::new(first_records.to_owned(), first_targets.to_owned())
            .with_feature_names(self.feature_names.clone());
        let second = DatasetBase::new(second_records.to_owned(), second_targets.to_owned())
            .with_feature_names(self.feature_names);

        (first, second)
    }

    /// Shuffle the samples of a dataset with the given random number generator
    pub fn shuffle<Rn: Rng>(self, rng: &mut Rn) -> Dataset<F, L> {
        let mut indices = (0..self.nsamples()).collect::<Vec<_>>();
        indices.shuffle(rng);

        let records: Array2<F> = self.records.select(Axis(0), &indices);
        let targets: Array1<L> = self.targets.select(Axis(0), &indices);

        DatasetBase::new(records, targets).with_feature_names(self.feature_names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn split_keeps_order_and_floors() {
        let dataset = Dataset::new(
            array![[1.], [2.], [3.], [4.], [5.]],
            array![10., 20., 30., 40., 50.],
        )
        .with_feature_names(vec!["x"]);

        let (train, test) = dataset.split_with_ratio(0.8);

        assert_eq!(train.records(), &array![[1.], [2.], [3.], [4.]]);
        assert_eq!(train.targets(), &array![10., 20., 30., 40.]);
        assert_eq!(test.records(), &array![[5.]]);
        assert_eq!(test.targets(), &array![50.]);
        assert_eq!(test.feature_names(), vec!["x".to_string()]);
    }

    #[test]
    fn split_of_seven_samples() {
        let dataset = Dataset::new(Array2::<f64>::zeros((7, 2)), Array1::<f64>::zeros(7));
        let (train, test) = dataset.split_with_ratio(0.8);

        assert_eq!(train.nsamples(), 5);
        assert_eq!(test.nsamples(), 2);
    }

    #[test]
    fn default_feature_names() {
        let dataset = Dataset::new(Array2::<f64>::zeros((1, 3)), array![0.]);

        assert_eq!(
            dataset.feature_names(),
            vec!["feature-0", "feature-1", "feature-2"]
        );
    }

    #[test]
    fn shuffle_keeps_rows_aligned() {
        let dataset = Dataset::new(
            array![[0.], [1.], [2.], [3.], [4.], [5.]],
            array![0., 10., 20., 30., 40., 50.],
        );
        let mut rng = SmallRng::seed_from_u64(7);
        let shuffled = dataset.shuffle(&mut rng);

        for (row, target) in shuffled.records().rows().into_iter().zip(shuffled.targets()) {
            assert_eq!(row[0] * 10., *target);
        }
    }
}
