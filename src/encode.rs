//! Feature encoding
//!
//! Turns the selected feature columns and the target column of a [`Table`] into a numeric
//! [`Dataset`]. Numeric cells are taken as they are, every other present cell is replaced by its
//! fallback code (see [`Value::encode`](crate::table::Value::encode)). Rows with a missing feature
//! or a missing target are dropped entirely, so records and targets always stay aligned.
use log::debug;
use ndarray::{Array1, Array2};

use crate::dataset::{Dataset, DatasetBase};
use crate::error::{Error, Result};
use crate::table::Table;

/// Encode a table into a dataset of features and targets
///
/// Fails with [`Error::InvalidTarget`] or [`Error::InvalidFeature`] if a named column is not part
/// of the table and with [`Error::NoValidRows`] if every row had to be dropped.
pub fn encode<S: AsRef<str>>(
    table: &Table,
    features: &[S],
    target: &str,
) -> Result<Dataset<f64, f64>> {
    if !table.has_column(target) {
        return Err(Error::InvalidTarget(target.to_string()));
    }
    if let Some(feature) = features.iter().find(|f| !table.has_column(f.as_ref())) {
        return Err(Error::InvalidFeature(feature.as_ref().to_string()));
    }

    let mut records = Vec::with_capacity(table.nrows() * features.len());
    let mut targets = Vec::with_capacity(table.nrows());

    'rows: for row in table.rows() {
        let y = match row.get(target).encode() {
            Some(y) => y,
            None => continue,
        };

        let start = records.len();
        for feature in features {
            match row.get(feature.as_ref()).encode() {
                Some(x) => records.push(x),
                None => {
                    records.truncate(start);
                    continue 'rows;
                }
            }
        }
        targets.push(y);
    }

    if targets.is_empty() {
        return Err(Error::NoValidRows);
    }

    debug!(
        "encoded {} rows with {} features, dropped {} rows with missing cells",
        targets.len(),
        features.len(),
        table.nrows() - targets.len()
    );

    let records = Array2::from_shape_vec((targets.len(), features.len()), records)?;
    let targets = Array1::from(targets);

    Ok(DatasetBase::new(records, targets)
        .with_feature_names(features.iter().map(|f| f.as_ref()).collect()))
}
