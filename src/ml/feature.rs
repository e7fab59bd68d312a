//! Derived-feature computations: list counts, interactions and quantile
//! binning of the duration and episode-count columns.

use serde::{Deserialize, Serialize};

use crate::cell::Cell;
use crate::dataframe::DataFrame;
use crate::error::{Error, Result};
use crate::ml::pipeline::Transformer;
use crate::series::Series;

/// Output column name for the binned duration feature
pub const DURATION_CATEGORY: &str = "DurationCat";

/// Output column name for the binned episode-count feature
pub const EPISODES_CATEGORY: &str = "EpisodesCat";

/// Quantile bin edges frozen at fit time
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BinState {
    duration_edges: Vec<f64>,
    episodes_edges: Vec<f64>,
}

/// Composite stage bundling four independent derived-feature computations:
///
/// - `<column>_Count` per configured list column (label count, 0 for
///   non-list cells);
/// - `<A>_x_<B>` per configured column pair (elementwise product);
/// - `DurationCat`: quantile-binned duration, labelled
///   `Very Short`/`Short`/`Medium`/`Long`;
/// - `EpisodesCat`: the same binning over the episode count, labelled
///   `Mini_Series`/`Short_Series`/`Standard_Series`/`Long_Running`.
///
/// Bin edges are deduplicated after the quantile computation, so heavy ties
/// in the training data shrink the effective bin count. Bin indices map
/// positionally into the fixed label lists, meaning a shrunk edge set
/// reuses only the first N labels. That is a known quirk carried over from
/// the source behavior, not a bug.
pub struct FeatureEngineering {
    list_columns: Vec<String>,
    interaction_pairs: Vec<(String, String)>,
    duration_col: String,
    duration_q: usize,
    duration_labels: Vec<String>,
    episodes_col: String,
    episodes_q: usize,
    episodes_labels: Vec<String>,
    state: Option<BinState>,
}

impl FeatureEngineering {
    /// Create the stage with the anime-dataset defaults
    pub fn new() -> Self {
        FeatureEngineering {
            list_columns: vec![
                "Genres".to_string(),
                "Producers".to_string(),
                "Studios".to_string(),
            ],
            interaction_pairs: vec![("Episodes".to_string(), "duration_minutes".to_string())],
            duration_col: "duration_minutes".to_string(),
            duration_q: 4,
            duration_labels: vec![
                "Very Short".to_string(),
                "Short".to_string(),
                "Medium".to_string(),
                "Long".to_string(),
            ],
            episodes_col: "Episodes".to_string(),
            episodes_q: 4,
            episodes_labels: vec![
                "Mini_Series".to_string(),
                "Short_Series".to_string(),
                "Standard_Series".to_string(),
                "Long_Running".to_string(),
            ],
            state: None,
        }
    }

    /// Set the list columns to count
    pub fn with_list_columns(mut self, columns: Vec<String>) -> Self {
        self.list_columns = columns;
        self
    }

    /// Set the interaction pairs
    pub fn with_interaction_pairs(mut self, pairs: Vec<(String, String)>) -> Self {
        self.interaction_pairs = pairs;
        self
    }

    /// Set the duration column and its quantile count
    pub fn with_duration_column(mut self, column: String, quantiles: usize) -> Self {
        self.duration_col = column;
        self.duration_q = quantiles;
        self
    }

    /// Set the episodes column and its quantile count
    pub fn with_episodes_column(mut self, column: String, quantiles: usize) -> Self {
        self.episodes_col = column;
        self.episodes_q = quantiles;
        self
    }

    /// Compute deduplicated quantile bin edges for one column
    fn fit_edges(&self, df: &DataFrame, col: &str, quantiles: usize) -> Result<Vec<f64>> {
        if quantiles == 0 {
            return Err(Error::InvalidValue(format!(
                "quantile count for column {} must be positive",
                col
            )));
        }
        let series = df.column_checked(col)?;
        let mut values: Vec<f64> = series.iter().filter_map(|cell| cell.as_f64()).collect();
        if values.is_empty() {
            return Err(Error::InsufficientData(format!(
                "column {} has no non-missing values to compute quantile edges from",
                col
            )));
        }
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let edges = quantile_edges(&values, quantiles);
        if edges.len() < 2 {
            return Err(Error::InsufficientData(format!(
                "column {} yields fewer than two distinct bin edges",
                col
            )));
        }
        Ok(edges)
    }

    /// Bucket one column against fitted edges, mapping bin indices into the
    /// label list positionally. Out-of-range and non-numeric values become
    /// missing categories.
    fn bin_column(series: &Series, edges: &[f64], labels: &[String]) -> Vec<Cell> {
        series
            .iter()
            .map(|cell| {
                cell.as_f64()
                    .and_then(|v| bin_index(v, edges))
                    .and_then(|i| labels.get(i))
                    .map_or(Cell::Na, |label| Cell::Str(label.clone()))
            })
            .collect()
    }
}

impl Default for FeatureEngineering {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer for FeatureEngineering {
    fn fit(&mut self, df: &DataFrame, _target: Option<&Series>) -> Result<()> {
        let duration_edges = self.fit_edges(df, &self.duration_col, self.duration_q)?;
        let episodes_edges = self.fit_edges(df, &self.episodes_col, self.episodes_q)?;
        self.state = Some(BinState {
            duration_edges,
            episodes_edges,
        });
        Ok(())
    }

    fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| Error::NotFitted("FeatureEngineering".to_string()))?;

        let mut result = df.clone();

        // List-count features
        for col in &self.list_columns {
            let series = df.column_checked(col)?;
            let values: Vec<Cell> = series
                .iter()
                .map(|cell| match cell {
                    Cell::List(items) => Cell::Int(items.len() as i64),
                    _ => Cell::Int(0),
                })
                .collect();
            let name = format!("{}_Count", col);
            result.add_column(name.clone(), Series::new(values, Some(name)))?;
        }

        // Interaction features
        for (a, b) in &self.interaction_pairs {
            let series_a = df.column_checked(a)?;
            let series_b = df.column_checked(b)?;
            let values: Vec<Cell> = series_a
                .iter()
                .zip(series_b.iter())
                .map(|(cell_a, cell_b)| match (cell_a.as_f64(), cell_b.as_f64()) {
                    (Some(x), Some(y)) => Cell::Float(x * y),
                    _ => Cell::Na,
                })
                .collect();
            let name = format!("{}_x_{}", a, b);
            result.add_column(name.clone(), Series::new(values, Some(name)))?;
        }

        // Binned duration and episode-count categories
        let duration = df.column_checked(&self.duration_col)?;
        let values = Self::bin_column(duration, &state.duration_edges, &self.duration_labels);
        result.add_column(
            DURATION_CATEGORY.to_string(),
            Series::new(values, Some(DURATION_CATEGORY.to_string())),
        )?;

        let episodes = df.column_checked(&self.episodes_col)?;
        let values = Self::bin_column(episodes, &state.episodes_edges, &self.episodes_labels);
        result.add_column(
            EPISODES_CATEGORY.to_string(),
            Series::new(values, Some(EPISODES_CATEGORY.to_string())),
        )?;

        Ok(result)
    }

    fn feature_names_out(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .list_columns
            .iter()
            .map(|col| format!("{}_Count", col))
            .collect();
        names.extend(
            self.interaction_pairs
                .iter()
                .map(|(a, b)| format!("{}_x_{}", a, b)),
        );
        names.push(DURATION_CATEGORY.to_string());
        names.push(EPISODES_CATEGORY.to_string());
        names
    }
}

/// Quantile values at probabilities k/q for k in 0..=q, computed with
/// linear interpolation over sorted values, then deduplicated. The result
/// is non-decreasing, so exact dedup is enough.
fn quantile_edges(sorted: &[f64], q: usize) -> Vec<f64> {
    let n = sorted.len();
    let mut edges = Vec::with_capacity(q + 1);
    for k in 0..=q {
        let pos = (k as f64 / q as f64) * (n - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = pos.ceil() as usize;
        let frac = pos - lo as f64;
        edges.push(sorted[lo] * (1.0 - frac) + sorted[hi] * frac);
    }
    edges.dedup();
    edges
}

/// Right-closed bin lookup with the lowest bin closed on the left, so the
/// fitted minimum lands in bin 0. Values outside the edge range get no bin.
fn bin_index(value: f64, edges: &[f64]) -> Option<usize> {
    if value < edges[0] || value > edges[edges.len() - 1] {
        return None;
    }
    (0..edges.len() - 1).find(|&i| value <= edges[i + 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_edges_quartiles() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let edges = quantile_edges(&values, 4);
        assert_eq!(edges, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_quantile_edges_interpolation() {
        let values = vec![0.0, 10.0];
        let edges = quantile_edges(&values, 4);
        assert_eq!(edges, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
    }

    #[test]
    fn test_quantile_edges_collapse_on_ties() {
        let values = vec![1.0, 1.0, 1.0, 1.0, 9.0];
        let edges = quantile_edges(&values, 4);
        assert_eq!(edges, vec![1.0, 9.0]);
    }

    #[test]
    fn test_bin_index_bounds() {
        let edges = vec![0.0, 1.0, 2.0];
        assert_eq!(bin_index(0.0, &edges), Some(0));
        assert_eq!(bin_index(1.0, &edges), Some(0));
        assert_eq!(bin_index(1.5, &edges), Some(1));
        assert_eq!(bin_index(2.0, &edges), Some(1));
        assert_eq!(bin_index(-0.1, &edges), None);
        assert_eq!(bin_index(2.1, &edges), None);
    }
}
