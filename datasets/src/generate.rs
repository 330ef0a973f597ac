//! Utility functions for randomly generating datasets

use ndarray::{s, Array, Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2};
use ndarray_rand::{
    rand::Rng,
    rand_distr::{Distribution, StandardNormal},
    RandomExt,
};
use tablearn::table::{Row, Table, Value};
use tablearn::Dataset;

/// Given an input matrix `blob_centroids`, with shape `(n_blobs, n_features)`,
/// generate `blob_size` data points (a "blob") around each of the blob centroids.
///
/// More specifically, each blob is formed by `blob_size` points sampled from a standard normal
/// distribution centered in the blob centroid.
pub fn blobs(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let (n_centroids, n_features) = blob_centroids.dim();
    let mut blobs: Array2<f64> = Array2::zeros((n_centroids * blob_size, n_features));

    for (blob_index, blob_centroid) in blob_centroids.rows().into_iter().enumerate() {
        let blob = make_blob(blob_size, &blob_centroid, rng);

        let indexes = s![blob_index * blob_size..(blob_index + 1) * blob_size, ..];
        blobs.slice_mut(indexes).assign(&blob);
    }
    blobs
}

/// Generate `blob_size` data points (a "blob") around `blob_centroid`.
fn make_blob(
    blob_size: usize,
    blob_centroid: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let shape = (blob_size, blob_centroid.len());
    let origin_blob: Array2<f64> = Array::random_using(shape, StandardNormal, rng);
    origin_blob + blob_centroid
}

/// Two well separated blobs in two dimensions, labeled `0.0` and `1.0`
///
/// The blobs are centered at `(-2, -2)` and `(2, 2)`. Samples of the first blob come first.
pub fn linearly_separable(blob_size: usize, rng: &mut impl Rng) -> Dataset<f64, f64> {
    let centroids = ndarray::array![[-2., -2.], [2., 2.]];
    let records = blobs(blob_size, &centroids, rng);
    let targets = Array1::from_shape_fn(2 * blob_size, |i| (i / blob_size) as f64);

    Dataset::new(records, targets).with_feature_names(vec!["x", "y"])
}

/// Samples of a noisy linear function
///
/// Records are drawn from a standard normal distribution, the targets are
/// `records.dot(coefficients) + intercept` plus normal noise scaled by `noise`.
pub fn linear(
    nsamples: usize,
    coefficients: &[f64],
    intercept: f64,
    noise: f64,
    rng: &mut impl Rng,
) -> Dataset<f64, f64> {
    let records: Array2<f64> =
        Array::random_using((nsamples, coefficients.len()), StandardNormal, rng);
    let errors: Array1<f64> = Array::random_using(nsamples, StandardNormal, rng);
    let targets = records.dot(&Array1::from(coefficients.to_vec())) + intercept + errors * noise;

    Dataset::new(records, targets)
}

/// Convert a numeric dataset back into a table
///
/// Columns are named after the feature names, the targets are stored in column `target`.
pub fn to_table(dataset: &Dataset<f64, f64>, target: &str) -> Table {
    let names = dataset.feature_names();

    let rows = dataset
        .records()
        .axis_iter(Axis(0))
        .zip(dataset.targets().iter())
        .map(|(record, y)| {
            names
                .iter()
                .zip(record.iter())
                .fold(Row::new(), |row, (name, x)| row.with(name.as_str(), *x))
                .with(target, *y)
        })
        .collect();

    Table::new(rows)
}

const CITIES: [&str; 4] = ["Oslo", "Rome", "Lima", "Kyiv"];

/// A synthetic customer table with mixed column types
///
/// Columns:
/// * `age`: integer between 18 and 79, missing in about 5% of the rows
/// * `income`: yearly income
/// * `city`: one of four city names, empty in about 5% of the rows
/// * `plan`: `basic` or `premium`
/// * `spend`: monthly spend, a noisy linear function of age and income
/// * `churn`: `1` for young customers with low income, `0` otherwise
pub fn customers(nrows: usize, rng: &mut impl Rng) -> Table {
    let rows = (0..nrows)
        .map(|_| {
            let age = rng.gen_range(18..80) as f64;
            let income = (rng.gen_range(15_000.0..120_000.0f64) / 100.0).round() * 100.0;
            let noise: f64 = StandardNormal.sample(rng);
            let spend = 20.0 + 0.5 * age + 0.001 * income + 5.0 * noise;
            let churn = if age < 35.0 && income < 50_000.0 { 1.0 } else { 0.0 };

            let age = if rng.gen_bool(0.05) {
                Value::Missing
            } else {
                Value::from(age)
            };
            let city = if rng.gen_bool(0.05) {
                ""
            } else {
                CITIES[rng.gen_range(0..CITIES.len())]
            };
            let plan = if rng.gen_bool(0.3) { "premium" } else { "basic" };

            Row::new()
                .with("age", age)
                .with("income", income)
                .with("city", city)
                .with("plan", plan)
                .with("spend", (spend * 100.0).round() / 100.0)
                .with("churn", churn)
        })
        .collect();

    Table::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn blob_centers() {
        let mut rng = SmallRng::seed_from_u64(42);
        let centroids = array![[0., 0.], [100., 100.]];
        let data = blobs(500, &centroids, &mut rng);

        assert_eq!(data.dim(), (1000, 2));
        let second = data.slice(s![500.., ..]).mean_axis(Axis(0)).unwrap();
        assert_abs_diff_eq!(second, array![100., 100.], epsilon = 0.5);
    }

    #[test]
    fn separable_labels() {
        let mut rng = SmallRng::seed_from_u64(42);
        let dataset = linearly_separable(10, &mut rng);

        assert_eq!(dataset.nsamples(), 20);
        assert_abs_diff_eq!(dataset.targets().sum(), 10.);
        assert_abs_diff_eq!(dataset.targets()[0], 0.);
        assert_abs_diff_eq!(dataset.targets()[19], 1.);
    }

    #[test]
    fn noiseless_linear() {
        let mut rng = SmallRng::seed_from_u64(42);
        let dataset = linear(50, &[2., -1.], 3., 0., &mut rng);

        for (x, y) in dataset.records().rows().into_iter().zip(dataset.targets()) {
            assert_abs_diff_eq!(2. * x[0] - x[1] + 3., *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn table_round_trip_columns() {
        let dataset = Dataset::new(array![[1., 2.], [3., 4.]], array![0., 1.])
            .with_feature_names(vec!["a", "b"]);
        let table = to_table(&dataset, "label");

        assert_eq!(table.columns(), &["a", "b", "label"]);
        assert_eq!(table.rows()[1].get("b"), &Value::from(4.));
    }

    #[test]
    fn customer_table_shape() {
        let mut rng = SmallRng::seed_from_u64(42);
        let table = customers(200, &mut rng);

        assert_eq!(table.nrows(), 200);
        assert_eq!(
            table.columns(),
            &["age", "income", "city", "plan", "spend", "churn"]
        );
    }
}
