pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod ml;
pub mod model;
pub mod persistence;
pub mod validation;

pub use api::{create_router, AppState};
pub use config::AppConfig;
pub use error::{IrisError, Result};
pub use ml::{ForestParams, Pipeline, RandomForest, StandardScaler};
pub use model::{
    FeatureVector, ModelRegistry, ModelStatus, Prediction, TrainedModel, TrainingParams,
    TrainingSummary,
};
pub use persistence::ArtifactStore;
