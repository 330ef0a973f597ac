//! Model selection and the learner interface
//!
//! A user picks a model with a [`ModelChoice`] token. Before anything is trained the choice is
//! resolved against the detected problem type into a concrete [`ModelKind`], which is looked up
//! in a [`ModelRegistry`] of [`Learner`]s.
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use log::debug;
use ndarray::{Array1, Array2};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use tablearn::{problem::ProblemType, traits::*, Dataset};
use tablearn_ensemble::{RandomForestClassifier, RandomForestRegressor};
use tablearn_linear::{LinearError, LinearRegression, SimpleLinearRegression};
use tablearn_logistic::LogisticRegression;
use tablearn_trees::DecisionTree;

use crate::error::{BoxError, PipelineError, Result};

/// A fitted model behind the prediction trait
pub type BoxedModel = Box<dyn PredictInplace<Array2<f64>, Array1<f64>>>;

/// Predict the targets of `records` with a boxed model
pub fn predict(
    model: &dyn PredictInplace<Array2<f64>, Array1<f64>>,
    records: &Array2<f64>,
) -> Array1<f64> {
    let mut targets = model.default_target(records);
    model.predict_inplace(records, &mut targets);
    targets
}

/// The model token a user asks for
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelChoice {
    /// The default model of the problem type
    Auto,
    Linear,
    Logistic,
    DecisionTree,
    RandomForest,
}

impl FromStr for ModelChoice {
    type Err = PipelineError;

    /// Parse a token, ignoring case
    fn from_str(token: &str) -> Result<Self> {
        match token.to_lowercase().as_str() {
            "auto" => Ok(ModelChoice::Auto),
            "linear" => Ok(ModelChoice::Linear),
            "logistic" => Ok(ModelChoice::Logistic),
            "decisiontree" => Ok(ModelChoice::DecisionTree),
            "randomforest" => Ok(ModelChoice::RandomForest),
            _ => Err(PipelineError::UnknownModel(token.to_string())),
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let token = match self {
            ModelChoice::Auto => "auto",
            ModelChoice::Linear => "linear",
            ModelChoice::Logistic => "logistic",
            ModelChoice::DecisionTree => "decisiontree",
            ModelChoice::RandomForest => "randomforest",
        };
        write!(f, "{}", token)
    }
}

impl ModelChoice {
    /// Resolve the choice into the model trained for a problem type
    ///
    /// | problem | choice | model |
    /// |---|---|---|
    /// | regression | `auto`, `linear` | linear regression |
    /// | regression | `randomforest` | random forest regressor |
    /// | classification | `auto`, `logistic` | logistic regression |
    /// | classification | `decisiontree` | decision tree |
    /// | classification | `randomforest` | random forest classifier |
    ///
    /// Every other combination is a [`PipelineError::UnsupportedModel`].
    pub fn resolve(self, problem: ProblemType) -> Result<ModelKind> {
        match (problem, self) {
            (ProblemType::Regression, ModelChoice::Auto)
            | (ProblemType::Regression, ModelChoice::Linear) => Ok(ModelKind::LinearRegression),
            (ProblemType::Regression, ModelChoice::RandomForest) => {
                Ok(ModelKind::RandomForestRegressor)
            }
            (ProblemType::Classification, ModelChoice::Auto)
            | (ProblemType::Classification, ModelChoice::Logistic) => {
                Ok(ModelKind::LogisticRegression)
            }
            (ProblemType::Classification, ModelChoice::DecisionTree) => Ok(ModelKind::DecisionTree),
            (ProblemType::Classification, ModelChoice::RandomForest) => {
                Ok(ModelKind::RandomForestClassifier)
            }
            (problem, model) => Err(PipelineError::UnsupportedModel { model, problem }),
        }
    }
}

/// The concrete models a pipeline can train
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelKind {
    LinearRegression,
    RandomForestRegressor,
    LogisticRegression,
    DecisionTree,
    RandomForestClassifier,
}

impl ModelKind {
    pub const ALL: [ModelKind; 5] = [
        ModelKind::LinearRegression,
        ModelKind::RandomForestRegressor,
        ModelKind::LogisticRegression,
        ModelKind::DecisionTree,
        ModelKind::RandomForestClassifier,
    ];

    /// Human readable name
    pub fn name(&self) -> &'static str {
        match self {
            ModelKind::LinearRegression => "Linear Regression",
            ModelKind::RandomForestRegressor => "Random Forest Regressor",
            ModelKind::LogisticRegression => "Logistic Regression",
            ModelKind::DecisionTree => "Decision Tree",
            ModelKind::RandomForestClassifier => "Random Forest Classifier",
        }
    }

    pub fn problem_type(&self) -> ProblemType {
        match self {
            ModelKind::LinearRegression | ModelKind::RandomForestRegressor => {
                ProblemType::Regression
            }
            _ => ProblemType::Classification,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Anything which can be fitted on an encoded dataset
///
/// This is the seam for substituting models: implement it for a custom type and
/// [register](ModelRegistry::register) it for a [`ModelKind`].
pub trait Learner {
    fn fit(&self, dataset: &Dataset<f64, f64>) -> std::result::Result<BoxedModel, BoxError>;
}

/// Adapts hyperparameters implementing [`Fit`] to a [`Learner`]
///
/// `E` is the error type the hyperparameters fit with.
pub struct Estimator<P, E> {
    params: P,
    marker: PhantomData<fn() -> E>,
}

impl<P, E> Estimator<P, E> {
    pub fn new(params: P) -> Self {
        Estimator {
            params,
            marker: PhantomData,
        }
    }

    pub fn params(&self) -> &P {
        &self.params
    }
}

impl<P, E> Learner for Estimator<P, E>
where
    P: Fit<Array2<f64>, Array1<f64>, E>,
    P::Object: PredictInplace<Array2<f64>, Array1<f64>> + 'static,
    E: std::error::Error + From<tablearn::Error> + Send + Sync + 'static,
{
    fn fit(&self, dataset: &Dataset<f64, f64>) -> std::result::Result<BoxedModel, BoxError> {
        let model = self.params.fit(dataset)?;
        Ok(Box::new(model))
    }
}

/// Ordinary least squares, in closed form for a single feature
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearLearner;

impl Learner for LinearLearner {
    fn fit(&self, dataset: &Dataset<f64, f64>) -> std::result::Result<BoxedModel, BoxError> {
        if dataset.nfeatures() == 1 {
            debug!("single feature, fitting simple linear regression");
            Estimator::<_, LinearError>::new(SimpleLinearRegression).fit(dataset)
        } else {
            Estimator::<_, LinearError>::new(LinearRegression::new()).fit(dataset)
        }
    }
}

/// The learner used for every model kind
pub struct ModelRegistry {
    learners: HashMap<ModelKind, Box<dyn Learner>>,
}

impl ModelRegistry {
    /// A registry without any learners
    pub fn empty() -> Self {
        ModelRegistry {
            learners: HashMap::new(),
        }
    }

    /// Register the learner of a model kind, replacing the previous one
    pub fn register<L: Learner + 'static>(&mut self, kind: ModelKind, learner: L) -> &mut Self {
        self.learners.insert(kind, Box::new(learner));
        self
    }

    /// Builder variant of [`register`](Self::register)
    pub fn with<L: Learner + 'static>(mut self, kind: ModelKind, learner: L) -> Self {
        self.register(kind, learner);
        self
    }

    pub fn get(&self, kind: ModelKind) -> Result<&dyn Learner> {
        self.learners
            .get(&kind)
            .map(|learner| learner.as_ref())
            .ok_or(PipelineError::Unregistered(kind))
    }

    pub fn contains(&self, kind: ModelKind) -> bool {
        self.learners.contains_key(&kind)
    }
}

impl Default for ModelRegistry {
    /// Default learners
    ///
    /// * linear regression: [`LinearLearner`]
    /// * logistic regression: learning rate `0.01`, `1000` iterations
    /// * decision tree: depth limit `10`, at least `2` samples to split
    /// * random forests: `10` trees on `floor(sqrt(nfeatures))` features each, seed `42`
    fn default() -> Self {
        ModelRegistry::empty()
            .with(ModelKind::LinearRegression, LinearLearner)
            .with(
                ModelKind::RandomForestRegressor,
                Estimator::<_, tablearn::Error>::new(RandomForestRegressor::<f64>::params()),
            )
            .with(
                ModelKind::LogisticRegression,
                Estimator::<_, tablearn_logistic::error::Error>::new(
                    LogisticRegression::<f64>::default(),
                ),
            )
            .with(
                ModelKind::DecisionTree,
                Estimator::<_, tablearn::Error>::new(DecisionTree::<f64, f64>::params()),
            )
            .with(
                ModelKind::RandomForestClassifier,
                Estimator::<_, tablearn::Error>::new(RandomForestClassifier::<f64, f64>::params()),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn parse_tokens() {
        assert_eq!("auto".parse::<ModelChoice>().unwrap(), ModelChoice::Auto);
        assert_eq!("DecisionTree".parse::<ModelChoice>().unwrap(), ModelChoice::DecisionTree);
        assert_eq!("RANDOMFOREST".parse::<ModelChoice>().unwrap(), ModelChoice::RandomForest);
        assert!(matches!(
            "svm".parse::<ModelChoice>(),
            Err(PipelineError::UnknownModel(token)) if token == "svm"
        ));
    }

    #[test]
    fn resolve_dispatch_table() {
        let regression = ProblemType::Regression;
        let classification = ProblemType::Classification;

        assert_eq!(ModelChoice::Auto.resolve(regression).unwrap(), ModelKind::LinearRegression);
        assert_eq!(ModelChoice::Linear.resolve(regression).unwrap(), ModelKind::LinearRegression);
        assert_eq!(
            ModelChoice::RandomForest.resolve(regression).unwrap(),
            ModelKind::RandomForestRegressor
        );
        assert_eq!(
            ModelChoice::Auto.resolve(classification).unwrap(),
            ModelKind::LogisticRegression
        );
        assert_eq!(
            ModelChoice::Logistic.resolve(classification).unwrap(),
            ModelKind::LogisticRegression
        );
        assert_eq!(
            ModelChoice::DecisionTree.resolve(classification).unwrap(),
            ModelKind::DecisionTree
        );
        assert_eq!(
            ModelChoice::RandomForest.resolve(classification).unwrap(),
            ModelKind::RandomForestClassifier
        );

        assert!(matches!(
            ModelChoice::Logistic.resolve(regression),
            Err(PipelineError::UnsupportedModel {
                model: ModelChoice::Logistic,
                problem: ProblemType::Regression
            })
        ));
        assert!(matches!(
            ModelChoice::Linear.resolve(classification),
            Err(PipelineError::UnsupportedModel { .. })
        ));
        assert!(ModelChoice::DecisionTree.resolve(regression).is_err());
    }

    #[test]
    fn default_registry_is_complete() {
        let registry = ModelRegistry::default();
        for kind in ModelKind::ALL.iter() {
            assert!(registry.contains(*kind), "{} missing", kind);
        }

        assert!(matches!(
            ModelRegistry::empty().get(ModelKind::DecisionTree),
            Err(PipelineError::Unregistered(ModelKind::DecisionTree))
        ));
    }

    struct Constant(f64);

    impl PredictInplace<Array2<f64>, Array1<f64>> for Constant {
        fn predict_inplace(&self, _x: &Array2<f64>, y: &mut Array1<f64>) {
            y.fill(self.0);
        }

        fn default_target(&self, x: &Array2<f64>) -> Array1<f64> {
            Array1::zeros(x.nrows())
        }
    }

    struct MeanLearner;

    impl Learner for MeanLearner {
        fn fit(&self, dataset: &Dataset<f64, f64>) -> std::result::Result<BoxedModel, BoxError> {
            let mean = dataset.targets().mean().ok_or("no targets")?;
            Ok(Box::new(Constant(mean)))
        }
    }

    #[test]
    fn registered_learner_replaces_default() {
        let mut registry = ModelRegistry::default();
        registry.register(ModelKind::LinearRegression, MeanLearner);

        let dataset = Dataset::new(array![[1.], [2.], [3.]], array![1., 2., 6.]);
        let model = registry
            .get(ModelKind::LinearRegression)
            .unwrap()
            .fit(&dataset)
            .unwrap();

        assert_eq!(predict(model.as_ref(), dataset.records()), array![3., 3., 3.]);
    }

    #[test]
    fn linear_learner_picks_form_by_feature_count() {
        let single = Dataset::new(array![[1.], [1.], [1.]], array![1., 2., 3.]);
        // a constant feature has no closed form slope
        assert!(LinearLearner.fit(&single).is_err());

        let multi = Dataset::new(
            array![[0., 1.], [1., 0.], [2., 2.], [3., 1.]],
            array![2., 3., 7., 8.],
        );
        let model = LinearLearner.fit(&multi).unwrap();
        let predictions = predict(model.as_ref(), multi.records());
        approx::assert_abs_diff_eq!(predictions, array![2., 3., 7., 8.], epsilon = 1e-9);
    }
}
