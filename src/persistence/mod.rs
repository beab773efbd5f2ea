//! Persistence Layer for the trained model
//!
//! The pipeline and its metadata are stored as a pair of JSON files and
//! reloaded on startup so a restart does not require retraining.

pub mod artifacts;

pub use artifacts::{ArtifactStore, METADATA_FILE, MODEL_FILE};
