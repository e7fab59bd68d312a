use serde::{Deserialize, Serialize};

use crate::cell::Cell;

/// A one-dimensional named column of cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Cell values
    values: Vec<Cell>,

    /// Optional column name
    name: Option<String>,
}

impl Series {
    /// Create a new Series from a vector of cells
    pub fn new(values: Vec<Cell>, name: Option<String>) -> Self {
        Series { values, name }
    }

    /// Length of the Series
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the Series is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a cell by position
    pub fn get(&self, pos: usize) -> Option<&Cell> {
        self.values.get(pos)
    }

    /// Borrow the cell values
    pub fn values(&self) -> &[Cell] {
        &self.values
    }

    /// Iterate over the cells
    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.values.iter()
    }

    /// Append a cell
    pub fn push(&mut self, cell: Cell) {
        self.values.push(cell);
    }

    /// Get the column name
    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    /// Set the column name
    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Apply a function to every cell, producing a new Series
    pub fn map<F>(&self, f: F) -> Series
    where
        F: Fn(&Cell) -> Cell,
    {
        Series {
            values: self.values.iter().map(f).collect(),
            name: self.name.clone(),
        }
    }

    /// Number of missing cells
    pub fn count_na(&self) -> usize {
        self.values.iter().filter(|c| c.is_na()).count()
    }

    /// Non-missing numeric values, in row order
    fn numeric_values(&self) -> Vec<f64> {
        self.values.iter().filter_map(|c| c.as_f64()).collect()
    }

    /// Mean of the non-missing numeric values
    pub fn mean(&self) -> Option<f64> {
        let values = self.numeric_values();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Median of the non-missing numeric values
    pub fn median(&self) -> Option<f64> {
        let mut values = self.numeric_values();
        if values.is_empty() {
            return None;
        }
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let mid = values.len() / 2;
        if values.len() % 2 == 0 {
            Some((values[mid - 1] + values[mid]) / 2.0)
        } else {
            Some(values[mid])
        }
    }

    /// Minimum of the non-missing numeric values
    pub fn min(&self) -> Option<f64> {
        self.numeric_values()
            .into_iter()
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))))
    }

    /// Maximum of the non-missing numeric values
    pub fn max(&self) -> Option<f64> {
        self.numeric_values()
            .into_iter()
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
    }
}
