//! Problem-type detection
//!
//! Once the user has picked a target column, its values decide whether the task is a
//! classification or a regression problem. For classification tasks the class balance is
//! recorded as well.
use std::fmt;

use log::debug;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::profile::{Analysis, NUMERIC_RATIO};
use crate::table::{Table, Value};

/// Targets with at most this many distinct values are always classification targets
pub const MAX_CLASSES: usize = 20;

/// Targets whose distinct values make up less than this share of the rows are classification
/// targets
pub const CLASS_RATIO: f64 = 0.1;

/// Kind of supervised learning problem
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemType {
    Classification,
    Regression,
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProblemType::Classification => write!(f, "classification"),
            ProblemType::Regression => write!(f, "regression"),
        }
    }
}

/// Distinct present values, compared by variant and content
fn distinct_values<'a>(values: impl Iterator<Item = &'a Value>) -> Vec<&'a Value> {
    let mut distinct: Vec<&Value> = Vec::new();
    for value in values.filter(|value| !value.is_missing()) {
        // `PartialEq` would treat two NaN numbers as different values
        let seen = distinct.iter().any(|known| match (known, value) {
            (Value::Number(a), Value::Number(b)) => a.to_bits() == b.to_bits() || a == b,
            (a, b) => a == &b,
        });
        if !seen {
            distinct.push(value);
        }
    }
    distinct
}

impl ProblemType {
    /// Detect the problem type of the target column
    ///
    /// 1. at most [`MAX_CLASSES`] distinct values, or fewer distinct values than
    ///    [`CLASS_RATIO`] of the rows: classification
    /// 2. more than 80% of the present values are numeric: regression
    /// 3. otherwise: classification
    ///
    /// Fails with [`Error::InvalidTarget`] if the table has no such column.
    pub fn detect(table: &Table, target: &str) -> Result<ProblemType> {
        if !table.has_column(target) {
            return Err(Error::InvalidTarget(target.to_string()));
        }

        let distinct = distinct_values(table.column(target)).len();
        if distinct <= MAX_CLASSES || (distinct as f64) < CLASS_RATIO * table.nrows() as f64 {
            debug!("target `{}` has {} distinct values", target, distinct);
            return Ok(ProblemType::Classification);
        }

        let (present, numeric) = table
            .column(target)
            .filter(|value| !value.is_missing())
            .fold((0usize, 0usize), |(present, numeric), value| {
                (present + 1, numeric + value.is_numeric() as usize)
            });

        if numeric as f64 > NUMERIC_RATIO * present as f64 {
            Ok(ProblemType::Regression)
        } else {
            Ok(ProblemType::Classification)
        }
    }
}

/// Number of rows per target value
///
/// Keys are the string form of the target values, in order of their first appearance. Every
/// row is counted, so the counts sum to the number of rows. Missing targets are counted under
/// the empty key.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassBalance(Vec<(String, usize)>);

impl ClassBalance {
    /// Count the values of a target column
    pub fn of(table: &Table, target: &str) -> ClassBalance {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for value in table.column(target) {
            let key = value.to_string();
            match counts.iter_mut().find(|(known, _)| *known == key) {
                Some((_, count)) => *count += 1,
                None => counts.push((key, 1)),
            }
        }

        ClassBalance(counts)
    }

    /// Count of a single class
    pub fn get(&self, class: &str) -> Option<usize> {
        self.0
            .iter()
            .find(|(known, _)| known == class)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(class, count)| (class.as_str(), *count))
    }

    /// Number of distinct classes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Total number of counted rows
    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, count)| count).sum()
    }
}

impl Analysis {
    /// Select the prediction target
    ///
    /// Validates that the column exists, then records the target, its problem type and, for
    /// classification problems, the class balance. A previously selected target is replaced.
    pub fn select_target(&mut self, table: &Table, target: &str) -> Result<ProblemType> {
        let problem_type = ProblemType::detect(table, target)?;

        self.target = Some(target.to_string());
        self.problem_type = Some(problem_type);
        self.class_balance = match problem_type {
            ProblemType::Classification => Some(ClassBalance::of(table, target)),
            ProblemType::Regression => None,
        };

        debug!("selected target `{}` ({})", target, problem_type);

        Ok(problem_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Row;

    fn target_table(values: Vec<Value>) -> Table {
        Table::new(
            values
                .into_iter()
                .enumerate()
                .map(|(i, value)| Row::new().with("id", i as f64).with("y", value))
                .collect(),
        )
    }

    #[test]
    fn few_classes_are_classification() {
        // five distinct values out of 1000 rows
        let table = target_table((0..1000).map(|i| Value::from((i % 5) as f64)).collect());

        assert_eq!(
            ProblemType::detect(&table, "y"),
            Ok(ProblemType::Classification)
        );
    }

    #[test]
    fn many_numeric_values_are_regression() {
        // 21 distinct values out of 100 rows: above both class limits
        let table = target_table((0..100).map(|i| Value::from((i % 21) as f64)).collect());

        assert_eq!(ProblemType::detect(&table, "y"), Ok(ProblemType::Regression));
    }

    #[test]
    fn low_cardinality_ratio_is_classification() {
        // 21 distinct values out of 1000 rows stay below 10% of the rows
        let table = target_table((0..1000).map(|i| Value::from((i % 21) as f64)).collect());

        assert_eq!(
            ProblemType::detect(&table, "y"),
            Ok(ProblemType::Classification)
        );
    }

    #[test]
    fn many_text_values_are_classification() {
        let table = target_table((0..50).map(|i| Value::from(format!("name-{}", i))).collect());

        assert_eq!(
            ProblemType::detect(&table, "y"),
            Ok(ProblemType::Classification)
        );
    }

    #[test]
    fn number_and_numeric_text_are_distinct() {
        let values = vec![Value::from(1.), Value::from("1"), Value::from(1.), Value::Missing];
        assert_eq!(distinct_values(values.iter()).len(), 2);
    }

    #[test]
    fn unknown_target() {
        let table = target_table(vec![Value::from(1.)]);

        assert_eq!(
            ProblemType::detect(&table, "label"),
            Err(Error::InvalidTarget("label".to_string()))
        );
    }

    #[test]
    fn class_balance_counts_every_row() {
        let table = target_table(vec![
            "cat".into(),
            "dog".into(),
            "cat".into(),
            Value::Missing,
            Value::from(1.),
        ]);
        let balance = ClassBalance::of(&table, "y");

        assert_eq!(
            balance.iter().collect::<Vec<_>>(),
            vec![("cat", 2), ("dog", 1), ("", 1), ("1", 1)]
        );
        assert_eq!(balance.total(), table.nrows());
        assert_eq!(balance.get("cat"), Some(2));
    }

    #[test]
    fn select_target_updates_analysis() {
        let table = target_table(vec!["yes".into(), "no".into(), "yes".into()]);
        let mut analysis = Analysis::profile(&table).unwrap();

        assert_eq!(
            analysis.select_target(&table, "y"),
            Ok(ProblemType::Classification)
        );
        assert_eq!(analysis.target(), Some("y"));
        assert_eq!(analysis.problem_type(), Some(ProblemType::Classification));
        assert_eq!(analysis.class_balance().unwrap().get("yes"), Some(2));
        assert_eq!(analysis.feature_columns(), vec!["id".to_string()]);

        let mut analysis = Analysis::profile(&table).unwrap();
        assert!(analysis.select_target(&table, "missing").is_err());
        assert_eq!(analysis.target(), None);
    }
}
