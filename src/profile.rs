//! Dataset profiling
//!
//! Profiling looks at every column of a [`Table`] once, counts missing cells, decides whether
//! the column is numeric or categorical and computes summary statistics for numeric columns.
//! The result is an [`Analysis`] which is later completed by the target selection in
//! [`crate::problem`].
use log::debug;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::problem::{ClassBalance, ProblemType};
use crate::table::Table;

/// Share of numeric cells a column has to exceed to count as numeric
pub const NUMERIC_RATIO: f64 = 0.8;

/// Inferred type of a column
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Numeric,
    Categorical,
}

/// Summary statistics of a numeric column
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStatistics {
    pub mean: f64,
    /// Lower-middle element of the sorted values
    pub median: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation
    pub std: f64,
}

impl ColumnStatistics {
    /// Compute statistics of a non-empty list of values
    fn of(values: &mut [f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        values.sort_by(|a, b| a.total_cmp(b));
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;

        Some(ColumnStatistics {
            mean,
            median: values[(values.len() - 1) / 2],
            min: values[0],
            max: values[values.len() - 1],
            std: variance.sqrt(),
        })
    }
}

/// Profile of a single column
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub name: String,
    pub column_type: ColumnType,
    pub missing: usize,
    pub statistics: Option<ColumnStatistics>,
}

impl ColumnProfile {
    /// Profile the column `name` of a table
    pub fn of(table: &Table, name: &str) -> ColumnProfile {
        let mut non_missing = 0;
        let mut numeric = Vec::new();

        for value in table.column(name).filter(|value| !value.is_missing()) {
            non_missing += 1;
            if let Some(x) = value.as_number() {
                numeric.push(x);
            }
        }

        let column_type = if numeric.len() as f64 > NUMERIC_RATIO * non_missing as f64 {
            ColumnType::Numeric
        } else {
            ColumnType::Categorical
        };

        let statistics = match column_type {
            ColumnType::Numeric => ColumnStatistics::of(&mut numeric),
            ColumnType::Categorical => None,
        };

        debug!(
            "column `{}`: {:?}, {} of {} cells missing",
            name,
            column_type,
            table.nrows() - non_missing,
            table.nrows()
        );

        ColumnProfile {
            name: name.to_string(),
            column_type,
            missing: table.nrows() - non_missing,
            statistics,
        }
    }
}

/// The analysis record of a table
///
/// Created by [`Analysis::profile`] and completed by [`Analysis::select_target`]. It is the
/// single record handed between profiling, target selection and encoding.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub(crate) shape: (usize, usize),
    pub(crate) profiles: Vec<ColumnProfile>,
    pub(crate) target: Option<String>,
    pub(crate) problem_type: Option<ProblemType>,
    pub(crate) class_balance: Option<ClassBalance>,
}

impl Analysis {
    /// Profile every column of a table
    ///
    /// Fails with [`Error::EmptyDataset`] if the table has no rows.
    pub fn profile(table: &Table) -> Result<Analysis> {
        if table.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let profiles = table
            .columns()
            .iter()
            .map(|name| ColumnProfile::of(table, name))
            .collect();

        Ok(Analysis {
            shape: (table.nrows(), table.ncols()),
            profiles,
            target: None,
            problem_type: None,
            class_balance: None,
        })
    }

    /// Number of rows and columns
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn columns(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn profiles(&self) -> &[ColumnProfile] {
        &self.profiles
    }

    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.column(name).map(|p| p.column_type)
    }

    /// Number of missing cells in a column
    pub fn missing(&self, name: &str) -> Option<usize> {
        self.column(name).map(|p| p.missing)
    }

    pub fn statistics(&self, name: &str) -> Option<&ColumnStatistics> {
        self.column(name).and_then(|p| p.statistics.as_ref())
    }

    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns_of_type(ColumnType::Numeric)
    }

    pub fn categorical_columns(&self) -> Vec<&str> {
        self.columns_of_type(ColumnType::Categorical)
    }

    fn columns_of_type(&self, column_type: ColumnType) -> Vec<&str> {
        self.profiles
            .iter()
            .filter(|p| p.column_type == column_type)
            .map(|p| p.name.as_str())
            .collect()
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn problem_type(&self) -> Option<ProblemType> {
        self.problem_type
    }

    pub fn class_balance(&self) -> Option<&ClassBalance> {
        self.class_balance.as_ref()
    }

    /// All columns except the selected target, in table order
    pub fn feature_columns(&self) -> Vec<String> {
        self.profiles
            .iter()
            .filter(|p| Some(p.name.as_str()) != self.target())
            .map(|p| p.name.clone())
            .collect()
    }
}
