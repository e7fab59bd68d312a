//! Machine learning support for the preprocessing pipeline.
//!
//! Provides the fit/transform stage contract, the stateful feature
//! transformers used on the anime metadata tables, and row sampling
//! utilities for train/test splits.

pub mod feature;
pub mod pipeline;
pub mod preprocessing;
pub mod sampling;

pub use feature::FeatureEngineering;
pub use pipeline::{Pipeline, Transformer};
pub use preprocessing::{
    CyclicalMonthEncoder, FrequencyGrouper, MultiLabelBinarizer, MultiListModeImputer,
};
pub use sampling::{sample, train_test_split};
