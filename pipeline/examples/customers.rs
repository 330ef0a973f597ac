use std::error::Error;

use rand::{rngs::SmallRng, SeedableRng};

use tablearn_datasets::generate;
use tablearn_pipeline::{analyze, run};

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut rng = SmallRng::seed_from_u64(42);
    let table = generate::customers(1000, &mut rng);

    let mut analysis = analyze(&table)?;
    let (nrows, ncols) = analysis.shape();
    println!("{} rows, {} columns", nrows, ncols);
    for profile in analysis.profiles() {
        println!(
            "  {:<8} {:?}, {} missing",
            profile.name, profile.column_type, profile.missing
        );
    }

    let runs = [
        ("spend", "auto"),
        ("spend", "randomforest"),
        ("churn", "decisiontree"),
    ];
    for (target, model) in &runs {
        let result = run(&table, &mut analysis, target, model)?;
        println!(
            "\n{} -> {} ({}) trained on {} rows in {:?}",
            target,
            result.model_name(),
            result.problem_type(),
            result.train_size(),
            result.duration()
        );
        for (name, value) in result.metrics().entries() {
            println!("  {:<9} {}", name, value);
        }
        if let Some(cm) = result.confusion_matrix() {
            println!("{:?}", cm);
        }
    }

    Ok(())
}
