//! Stateful preprocessing transformers for noisy, list-valued metadata.
//!
//! Every transformer learns its parameters from a training table and applies
//! them deterministically afterwards. Malformed categorical data (unparsable
//! list cells, labels unseen at fit time) degrades silently; a missing
//! configured column is a contract violation and fails with
//! `Error::ColumnNotFound`.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::ml::pipeline::Transformer;
use crate::series::Series;

/// Catch-all category for labels below the frequency threshold
pub const OTHER_LABEL: &str = "Other";

/// Default minimum label frequency for `FrequencyGrouper`
pub const DEFAULT_MIN_FREQ: usize = 10;

/// Count labels across all cells of a column, preserving the order in which
/// labels are first encountered so frequency ties break deterministically.
fn label_counts(series: &Series) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for cell in series.iter() {
        for label in cell.labels() {
            if !counts.contains_key(&label) {
                order.push(label.clone());
            }
            *counts.entry(label).or_insert(0) += 1;
        }
    }
    order
        .into_iter()
        .map(|label| {
            let count = counts[&label];
            (label, count)
        })
        .collect()
}

/// Learned state of `MultiListModeImputer`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ImputerState {
    /// Per-column mode label; `None` when the column had no labels at all
    modes: HashMap<String, Option<String>>,
}

/// Replaces empty list cells with the most frequent label seen in that
/// column during training.
///
/// A column with zero labels across the whole training table records a
/// "no mode" sentinel; cells of such a column stay empty at transform time.
pub struct MultiListModeImputer {
    columns: Vec<String>,
    state: Option<ImputerState>,
}

impl MultiListModeImputer {
    /// Create an imputer for the given list columns
    pub fn new(columns: Vec<String>) -> Self {
        MultiListModeImputer {
            columns,
            state: None,
        }
    }
}

impl Transformer for MultiListModeImputer {
    fn fit(&mut self, df: &DataFrame, _target: Option<&Series>) -> Result<()> {
        let mut modes = HashMap::new();
        for col in &self.columns {
            let series = df.column_checked(col)?;
            // Ties keep the first-encountered label
            let mut best: Option<(String, usize)> = None;
            for (label, count) in label_counts(series) {
                if best.as_ref().map_or(true, |(_, c)| count > *c) {
                    best = Some((label, count));
                }
            }
            modes.insert(col.clone(), best.map(|(label, _)| label));
        }
        self.state = Some(ImputerState { modes });
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| Error::NotFitted("MultiListModeImputer".to_string()))?;

        let mut result = df.clone();
        for col in &self.columns {
            let series = df.column_checked(col)?;
            let mode = state
                .modes
                .get(col)
                .ok_or_else(|| Error::NotFitted(format!("no mode recorded for column {}", col)))?;

            let imputed = series.map(|cell| {
                let labels = cell.labels();
                if labels.is_empty() {
                    match mode {
                        Some(label) => Cell::List(vec![label.clone()]),
                        None => Cell::List(Vec::new()),
                    }
                } else {
                    Cell::List(labels)
                }
            });
            result.replace_column(col.clone(), imputed)?;
        }
        Ok(result)
    }

    fn feature_names_out(&self) -> Vec<String> {
        self.columns.clone()
    }
}

/// Learned state of `FrequencyGrouper`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GrouperState {
    /// Per-column set of labels meeting the frequency threshold
    frequent: HashMap<String, HashSet<String>>,
}

/// Collapses rare labels of list columns into the `"Other"` category.
///
/// Labels whose training frequency meets the per-column threshold pass
/// through unchanged; everything else becomes `"Other"`. Label order within
/// a cell is preserved, so a cell may legitimately hold several `"Other"`
/// entries.
pub struct FrequencyGrouper {
    columns: Vec<String>,
    min_freq: HashMap<String, usize>,
    state: Option<GrouperState>,
}

impl FrequencyGrouper {
    /// Create a grouper with per-column minimum frequencies.
    ///
    /// Columns without an entry in `min_freq` use `DEFAULT_MIN_FREQ`.
    pub fn new(columns: Vec<String>, min_freq: HashMap<String, usize>) -> Self {
        FrequencyGrouper {
            columns,
            min_freq,
            state: None,
        }
    }
}

impl Transformer for FrequencyGrouper {
    fn fit(&mut self, df: &DataFrame, _target: Option<&Series>) -> Result<()> {
        let mut frequent = HashMap::new();
        for col in &self.columns {
            let series = df.column_checked(col)?;
            let threshold = self.min_freq.get(col).copied().unwrap_or(DEFAULT_MIN_FREQ);
            let kept: HashSet<String> = label_counts(series)
                .into_iter()
                .filter(|(_, count)| *count >= threshold)
                .map(|(label, _)| label)
                .collect();
            frequent.insert(col.clone(), kept);
        }
        self.state = Some(GrouperState { frequent });
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| Error::NotFitted("FrequencyGrouper".to_string()))?;

        let mut result = df.clone();
        for col in &self.columns {
            let series = df.column_checked(col)?;
            let kept = state.frequent.get(col).ok_or_else(|| {
                Error::NotFitted(format!("no frequent set recorded for column {}", col))
            })?;

            let grouped = series.map(|cell| {
                let labels = cell
                    .labels()
                    .into_iter()
                    .map(|label| {
                        if kept.contains(&label) {
                            label
                        } else {
                            OTHER_LABEL.to_string()
                        }
                    })
                    .collect();
                Cell::List(labels)
            });
            result.replace_column(col.clone(), grouped)?;
        }
        Ok(result)
    }

    fn feature_names_out(&self) -> Vec<String> {
        self.columns.clone()
    }
}

/// Learned state of `MultiLabelBinarizer`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BinarizerState {
    /// Sorted label vocabulary per column
    vocabularies: HashMap<String, Vec<String>>,
    /// Output column names, in emission order
    output_features: Vec<String>,
}

/// Expands each list column into one 0/1 indicator column per label seen at
/// fit time, named `<column>__<label>`.
///
/// Labels outside the fitted vocabulary are silently unrepresented, so the
/// output arity is fixed once fit. The source list columns are dropped; all
/// other columns pass through unchanged ahead of the indicator blocks.
pub struct MultiLabelBinarizer {
    columns: Vec<String>,
    state: Option<BinarizerState>,
}

impl MultiLabelBinarizer {
    /// Create a binarizer for the given list columns
    pub fn new(columns: Vec<String>) -> Self {
        MultiLabelBinarizer {
            columns,
            state: None,
        }
    }
}

impl Transformer for MultiLabelBinarizer {
    fn fit(&mut self, df: &DataFrame, _target: Option<&Series>) -> Result<()> {
        let mut vocabularies = HashMap::new();
        let mut output_features = Vec::new();
        for col in &self.columns {
            let series = df.column_checked(col)?;
            let distinct: BTreeSet<String> =
                series.iter().flat_map(|cell| cell.labels()).collect();
            let vocabulary: Vec<String> = distinct.into_iter().collect();
            for label in &vocabulary {
                output_features.push(format!("{}__{}", col, label));
            }
            vocabularies.insert(col.clone(), vocabulary);
        }
        self.state = Some(BinarizerState {
            vocabularies,
            output_features,
        });
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| Error::NotFitted("MultiLabelBinarizer".to_string()))?;

        // Pass-through columns keep their original order
        let mut result = DataFrame::new();
        for name in df.column_names() {
            if !self.columns.contains(name) {
                if let Some(series) = df.column(name) {
                    result.add_column(name.clone(), series.clone())?;
                }
            }
        }

        for col in &self.columns {
            let series = df.column_checked(col)?;
            let vocabulary = state.vocabularies.get(col).ok_or_else(|| {
                Error::NotFitted(format!("no vocabulary recorded for column {}", col))
            })?;

            let row_labels: Vec<HashSet<String>> = series
                .iter()
                .map(|cell| cell.labels().into_iter().collect())
                .collect();

            for label in vocabulary {
                let values: Vec<Cell> = row_labels
                    .iter()
                    .map(|labels| Cell::Int(i64::from(labels.contains(label))))
                    .collect();
                let name = format!("{}__{}", col, label);
                result.add_column(name.clone(), Series::new(values, Some(name)))?;
            }
        }
        Ok(result)
    }

    fn feature_names_out(&self) -> Vec<String> {
        self.state
            .as_ref()
            .map(|state| state.output_features.clone())
            .unwrap_or_default()
    }
}

/// Encodes a month-of-year column (domain 1..=12) as sin/cos features so
/// December stays adjacent to January.
///
/// Missing values are filled with the median of the column in the table
/// being transformed, recomputed on every call rather than frozen at fit
/// time. That asymmetry with the other stages is intentional and covered by
/// tests; do not fold the median into the fitted state.
pub struct CyclicalMonthEncoder {
    columns: Vec<String>,
    output_features: Vec<String>,
}

const MONTHS_PER_YEAR: f64 = 12.0;

impl CyclicalMonthEncoder {
    /// Create an encoder for the given month columns
    pub fn new(columns: Vec<String>) -> Self {
        CyclicalMonthEncoder {
            columns,
            output_features: Vec::new(),
        }
    }
}

impl Transformer for CyclicalMonthEncoder {
    fn fit(&mut self, df: &DataFrame, _target: Option<&Series>) -> Result<()> {
        let mut output_features = Vec::new();
        for col in &self.columns {
            df.column_checked(col)?;
            output_features.push(format!("{}_sin", col));
            output_features.push(format!("{}_cos", col));
        }
        self.output_features = output_features;
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let mut result = df.clone();
        for col in &self.columns {
            let series = df.column_checked(col)?;
            let median = series.median();

            let mut sin_values = Vec::with_capacity(series.len());
            let mut cos_values = Vec::with_capacity(series.len());
            for cell in series.iter() {
                match cell.as_f64().or(median) {
                    Some(v) => {
                        let angle = 2.0 * std::f64::consts::PI * v / MONTHS_PER_YEAR;
                        sin_values.push(Cell::Float(angle.sin()));
                        cos_values.push(Cell::Float(angle.cos()));
                    }
                    // No value and no median to fill with
                    None => {
                        sin_values.push(Cell::Na);
                        cos_values.push(Cell::Na);
                    }
                }
            }

            let sin_name = format!("{}_sin", col);
            let cos_name = format!("{}_cos", col);
            result.add_column(sin_name.clone(), Series::new(sin_values, Some(sin_name)))?;
            result.add_column(cos_name.clone(), Series::new(cos_values, Some(cos_name)))?;
            result.drop_column(col)?;
        }
        Ok(result)
    }

    fn feature_names_out(&self) -> Vec<String> {
        self.output_features.clone()
    }
}
