//! Classification pipeline over the Iris reference dataset.
//!
//! Split, standardize and forest are plain values so a fitted pipeline can be
//! serialized, shared behind an `Arc` and applied without locks.

pub mod dataset;
pub mod forest;
pub mod pipeline;
pub mod scaler;

pub use dataset::{load_reference, stratified_split, LabeledData, ReferenceDataset, Split};
pub use dataset::{FEATURE_NAMES, TARGET_NAMES};
pub use forest::{ForestParams, RandomForest, DEFAULT_N_ESTIMATORS};
pub use pipeline::Pipeline;
pub use scaler::StandardScaler;
