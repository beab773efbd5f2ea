//! Model lifecycle management.
//!
//! Two states: untrained and trained. A successful `train` moves to (or
//! replaces) the trained state; nothing moves back.

pub mod registry;
pub mod types;

pub use registry::{train_model, ModelRegistry};
pub use types::{
    round4, version_from_timestamp, FeatureVector, ModelMetadata, ModelStatus, Prediction,
    TrainedModel, TrainingParams, TrainingSummary, VERSION_FORMAT,
};
