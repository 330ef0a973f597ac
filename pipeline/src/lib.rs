//! # Tabular learning pipeline
//!
//! `tablearn-pipeline` runs the whole journey of a table through the engine:
//!
//! 1. [`analyze`] profiles every column of a [`Table`]
//! 2. the caller picks a target column and a model token
//! 3. [`run`] detects the problem type, encodes the table, trains the resolved model on the
//!    leading 80% of the rows and evaluates it on the rest
//!
//! ```rust
//! use tablearn::table::{Row, Table};
//! use tablearn_pipeline::{analyze, run, Metrics};
//!
//! let table = Table::new(
//!     (0..50)
//!         .map(|i| {
//!             let x = i as f64;
//!             Row::new().with("x", x).with("y", 3. * x - 2.)
//!         })
//!         .collect(),
//! );
//!
//! let mut analysis = analyze(&table).unwrap();
//! let result = run(&table, &mut analysis, "y", "auto").unwrap();
//!
//! assert_eq!(result.model_name(), "Linear Regression");
//! assert_eq!(result.test_size(), 10);
//! match result.metrics() {
//!     Metrics::Regression(report) => assert!(report.mse < 1e-6),
//!     _ => unreachable!(),
//! }
//! ```
//!
//! The split is not randomized unless a shuffle seed is configured with
//! [`TrainerParams::shuffle`], so running the same table twice gives identical results.

mod error;
mod model;
mod results;
mod train;

use log::debug;

use tablearn::encode::encode;
use tablearn::profile::Analysis;
use tablearn::table::Table;
use tablearn::ParamGuard;

pub use error::{BoxError, PipelineError, Result};
pub use model::{
    predict, BoxedModel, Estimator, Learner, LinearLearner, ModelChoice, ModelKind, ModelRegistry,
};
pub use results::{Metrics, TrainingResult};
pub use train::{TrainerParams, TrainerValidParams};

/// Profile a table
///
/// Fails with [`tablearn::Error::EmptyDataset`] for a table without rows.
pub fn analyze(table: &Table) -> Result<Analysis> {
    Ok(Analysis::profile(table)?)
}

/// Train and evaluate a model for `target` with the default learners and split
///
/// See [`Pipeline::run`].
pub fn run(
    table: &Table,
    analysis: &mut Analysis,
    target: &str,
    model: &str,
) -> Result<TrainingResult> {
    Pipeline::default().run(table, analysis, target, model)
}

/// A registry of learners together with the trainer settings
#[derive(Default)]
pub struct Pipeline {
    registry: ModelRegistry,
    trainer: TrainerParams,
}

impl Pipeline {
    pub fn new(registry: ModelRegistry, trainer: TrainerParams) -> Self {
        Pipeline { registry, trainer }
    }

    /// Train and evaluate a model for `target`
    ///
    /// The model token is parsed first, so an unknown token fails before the analysis is
    /// touched. Then the target is selected on the analysis, which records the detected problem
    /// type and class balance, the token is resolved against the problem type and every other
    /// column of the table is encoded as a feature.
    pub fn run(
        &self,
        table: &Table,
        analysis: &mut Analysis,
        target: &str,
        model: &str,
    ) -> Result<TrainingResult> {
        let trainer = self.trainer.check()?;
        let choice: ModelChoice = model.parse()?;

        let problem_type = analysis.select_target(table, target)?;
        let kind = choice.resolve(problem_type)?;

        let features = analysis.feature_columns();
        let dataset = encode(table, &features, target)?;
        debug!(
            "encoded {} of {} rows with features {:?}",
            dataset.nsamples(),
            table.nrows(),
            features
        );

        trainer.train(dataset, problem_type, kind, &self.registry)
    }
}
