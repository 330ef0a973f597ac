use ndarray::Array1;
use rand::{rngs::SmallRng, SeedableRng};
use tablearn::prelude::*;
use tablearn_datasets::generate;
use tablearn_ensemble::{RandomForestClassifier, RandomForestRegressor};

const FEATURES: [&str; 4] = ["age", "income", "city", "plan"];

#[test]
fn customer_spend_regression() {
    let mut rng = SmallRng::seed_from_u64(42);
    let table = generate::customers(400, &mut rng);
    let (train, valid) = encode(&table, &FEATURES, "spend")
        .unwrap()
        .split_with_ratio(0.8);

    let forest = RandomForestRegressor::params().fit(&train).unwrap();
    let predictions: Array1<f64> = forest.predict(&valid);
    let report = RegressionReport::new(&predictions, valid.targets());

    assert!(report.r2 > 0.4, "r2 {}", report.r2);
    assert_eq!(forest.feature_importance().len(), 4);
}

#[test]
fn customer_churn_classification() {
    let mut rng = SmallRng::seed_from_u64(42);
    let table = generate::customers(400, &mut rng);
    let (train, valid) = encode(&table, &FEATURES, "churn")
        .unwrap()
        .split_with_ratio(0.8);

    let forest = RandomForestClassifier::params().fit(&train).unwrap();
    let predictions: Array1<f64> = forest.predict(&valid);
    let cm = predictions.confusion_matrix(valid.targets()).unwrap();

    assert!(cm.accuracy() >= 0.85, "accuracy {}", cm.accuracy());
}
