//! Raw tabular input
//!
//! A [`Table`] is the rectangular dataset handed over by the file readers: an ordered list of
//! [`Row`]s mapping column names to loosely typed [`Value`]s. The column set is derived from the
//! first row. The engine only ever reads a table.
use std::collections::HashMap;
use std::iter::FromIterator;

mod value;

pub use value::Value;

static MISSING: Value = Value::Missing;

/// A single row, mapping column names to cells
///
/// Columns keep the order in which they were inserted. Reading a column that is not part of the
/// row yields [`Value::Missing`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    names: Vec<String>,
    cells: HashMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a cell
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, name: K, value: V) {
        let name = name.into();
        if !self.cells.contains_key(&name) {
            self.names.push(name.clone());
        }
        self.cells.insert(name, value.into());
    }

    /// Builder-style version of [`Row::insert`]
    pub fn with<K: Into<String>, V: Into<Value>>(mut self, name: K, value: V) -> Self {
        self.insert(name, value);
        self
    }

    /// Cell of the given column, `Value::Missing` if the row has no such column
    pub fn get(&self, name: &str) -> &Value {
        self.cells.get(name).unwrap_or(&MISSING)
    }

    /// Column names in insertion order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|name| name.as_str())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (name, value) in iter {
            row.insert(name, value);
        }
        row
    }
}

/// An ordered sequence of rows sharing the column set of the first row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create a table, deriving the columns from the first row
    pub fn new(rows: Vec<Row>) -> Self {
        let columns = rows
            .first()
            .map(|row| row.columns().map(String::from).collect())
            .unwrap_or_default();

        Table { columns, rows }
    }

    /// Create a table from lists of `(column, value)` pairs
    pub fn from_records<K, V>(records: Vec<Vec<(K, V)>>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Table::new(
            records
                .into_iter()
                .map(|record| record.into_iter().collect())
                .collect(),
        )
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }

    /// Iterate over the cells of a column, one per row
    pub fn column<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.rows.iter().map(move |row| row.get(name))
    }
}
