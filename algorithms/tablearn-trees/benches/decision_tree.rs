use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2};
use ndarray_rand::rand::SeedableRng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::SmallRng;
use tablearn::prelude::*;
use tablearn_datasets::generate;
use tablearn_trees::{DecisionTree, RegressionTree};

fn decision_tree_bench(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);

    // Controls how many samples for each class are generated
    let training_set_sizes = &[100, 1000, 10000];

    let n_classes = 4;
    let n_features = 4;

    let hyperparams = DecisionTree::params();

    let mut group = c.benchmark_group("decision_tree");
    group.sample_size(10);

    for n in training_set_sizes.iter() {
        let centroids =
            Array2::random_using((n_classes, n_features), Uniform::new(-30., 30.), &mut rng);

        let train_x = generate::blobs(*n, &centroids, &mut rng);
        let train_y: Array1<usize> = (0..n_classes)
            .flat_map(|x| std::iter::repeat(x).take(*n))
            .collect();
        let dataset = DatasetBase::new(train_x, train_y);

        group.bench_with_input(BenchmarkId::from_parameter(n), &dataset, |b, d| {
            b.iter(|| hyperparams.fit(d))
        });
    }

    group.finish();
}

fn regression_tree_bench(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);
    let hyperparams = RegressionTree::params().max_depth(Some(10));

    let mut group = c.benchmark_group("regression_tree");
    group.sample_size(10);

    for n in [100, 1000, 10000].iter() {
        let dataset = generate::linear(*n, &[1., -2., 0.5], 3., 0.5, &mut rng);

        group.bench_with_input(BenchmarkId::from_parameter(n), &dataset, |b, d| {
            b.iter(|| hyperparams.fit(d))
        });
    }

    group.finish();
}

criterion_group!(benches, decision_tree_bench, regression_tree_bench);
criterion_main!(benches);
