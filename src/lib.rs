//! aniprep: feature engineering for noisy anime metadata tables.
//!
//! The crate supplies a small columnar table model (`Cell`, `Series`,
//! `DataFrame`), CSV/JSON ingestion, and a fit/transform pipeline of
//! stateful feature transformers: list-column mode imputation, rare-label
//! grouping, multi-label binarization, cyclical month encoding and
//! quantile-binned derived features.

pub mod cell;
pub mod dataframe;
pub mod error;
pub mod io;
pub mod ml;
pub mod series;

// Re-export commonly used types
pub use cell::Cell;
pub use dataframe::DataFrame;
pub use error::{Error, Result};
pub use series::Series;

// Export version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
