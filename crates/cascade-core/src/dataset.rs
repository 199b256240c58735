//! Columnar observational data.
//!
//! A [`Dataset`] is a set of named `f64` columns of equal length, one row
//! per observed sample. Missing cells are `f64::NAN`; every consumer in the
//! workspace treats NaN as "not observed" rather than as a numeric value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::DataError;

/// Returns true when a cell holds no observation.
pub fn is_missing(value: f64) -> bool {
    value.is_nan()
}

/// Named numeric columns of equal length.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    columns: BTreeMap<String, Vec<f64>>,
    n_rows: usize,
}

impl Dataset {
    /// An empty dataset with no columns and no rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from `(name, values)` pairs. The first column fixes
    /// the row count; all others must match it.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, DataError>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut dataset = Self::new();
        for (name, values) in columns {
            dataset.insert_column(name, values)?;
        }
        Ok(dataset)
    }

    /// Insert a column. The first insertion fixes the dataset's row count;
    /// later insertions with a different length are rejected.
    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), DataError> {
        let name = name.into();
        if self.columns.is_empty() {
            self.n_rows = values.len();
        } else if values.len() != self.n_rows {
            return Err(DataError::ColumnLengthMismatch {
                column: name,
                expected: self.n_rows,
                actual: values.len(),
            });
        }
        self.columns.insert(name, values);
        Ok(())
    }

    /// The values of one column, if present.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// One cell, if both the column and the row exist. A present cell may
    /// still be NaN (missing observation).
    pub fn value(&self, row: usize, name: &str) -> Option<f64> {
        self.columns.get(name).and_then(|col| col.get(row)).copied()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Column names in sorted order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// True when the dataset holds no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.n_rows == 0 || self.columns.is_empty()
    }
}
