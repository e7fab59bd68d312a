use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::error::{Error, Result};
use crate::series::Series;

/// An ordered collection of named columns aligned by row index.
///
/// Columns keep their insertion order. Row counts are enforced when a
/// column is added, so all columns are always the same length.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataFrame {
    /// Column storage, keyed by name
    columns: HashMap<String, Series>,

    /// Column names in insertion order
    column_order: Vec<String>,
}

impl DataFrame {
    /// Create an empty DataFrame
    pub fn new() -> Self {
        DataFrame {
            columns: HashMap::new(),
            column_order: Vec::new(),
        }
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.column_order
            .first()
            .and_then(|name| self.columns.get(name))
            .map_or(0, |series| series.len())
    }

    /// Number of columns
    pub fn column_count(&self) -> usize {
        self.column_order.len()
    }

    /// Column names in order
    pub fn column_names(&self) -> &[String] {
        &self.column_order
    }

    /// Whether a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&Series> {
        self.columns.get(name)
    }

    /// Get a column by name, failing with `ColumnNotFound` when absent
    pub fn column_checked(&self, name: &str) -> Result<&Series> {
        self.columns
            .get(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Add a new column
    pub fn add_column(&mut self, name: String, series: Series) -> Result<()> {
        if self.columns.contains_key(&name) {
            return Err(Error::DuplicateColumnName(name));
        }
        if !self.column_order.is_empty() && series.len() != self.row_count() {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count(),
                found: series.len(),
            });
        }
        self.column_order.push(name.clone());
        self.columns.insert(name, series);
        Ok(())
    }

    /// Replace an existing column, keeping its position
    pub fn replace_column(&mut self, name: String, series: Series) -> Result<()> {
        if !self.columns.contains_key(&name) {
            return Err(Error::ColumnNotFound(name));
        }
        if series.len() != self.row_count() {
            return Err(Error::InconsistentRowCount {
                expected: self.row_count(),
                found: series.len(),
            });
        }
        self.columns.insert(name, series);
        Ok(())
    }

    /// Remove a column
    pub fn drop_column(&mut self, name: &str) -> Result<()> {
        if self.columns.remove(name).is_none() {
            return Err(Error::ColumnNotFound(name.to_string()));
        }
        self.column_order.retain(|n| n != name);
        Ok(())
    }

    /// Select rows by position, producing a new DataFrame
    pub fn take(&self, indices: &[usize]) -> Result<DataFrame> {
        let row_count = self.row_count();
        if let Some(&bad) = indices.iter().find(|&&i| i >= row_count) {
            return Err(Error::IndexOutOfBounds {
                index: bad,
                size: row_count,
            });
        }

        let mut result = DataFrame::new();
        for name in &self.column_order {
            let series = &self.columns[name];
            let values: Vec<Cell> = indices
                .iter()
                .map(|&i| series.values()[i].clone())
                .collect();
            result.add_column(name.clone(), Series::new(values, Some(name.clone())))?;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_preserves_order() {
        let mut df = DataFrame::new();
        df.add_column(
            "x".to_string(),
            Series::new(
                vec![Cell::Int(1), Cell::Int(2), Cell::Int(3)],
                Some("x".to_string()),
            ),
        )
        .unwrap();

        let taken = df.take(&[2, 0]).unwrap();
        assert_eq!(taken.row_count(), 2);
        assert_eq!(taken.column("x").unwrap().get(0), Some(&Cell::Int(3)));
        assert_eq!(taken.column("x").unwrap().get(1), Some(&Cell::Int(1)));
    }

    #[test]
    fn test_take_out_of_bounds() {
        let mut df = DataFrame::new();
        df.add_column(
            "x".to_string(),
            Series::new(vec![Cell::Int(1)], Some("x".to_string())),
        )
        .unwrap();

        assert!(matches!(
            df.take(&[1]),
            Err(Error::IndexOutOfBounds { index: 1, size: 1 })
        ));
    }
}
