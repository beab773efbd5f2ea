use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{IrisError, Result};
use crate::ml::Pipeline;
use crate::validation::validate_measurements;

/// Version strings are the training timestamp in this format, so they sort
/// chronologically.
pub const VERSION_FORMAT: &str = "%Y%m%d-%H%M%S";

pub fn version_from_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(VERSION_FORMAT).to_string()
}

/// Round to 4 decimal places.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Parameters for a training run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingParams {
    /// Fraction of the dataset held out for evaluation, in (0, 1)
    pub test_size: f64,
    /// Seed for the split and the forest
    pub random_state: u64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            test_size: 0.2,
            random_state: 42,
        }
    }
}

/// Metadata persisted next to the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub target_names: Vec<String>,
    pub model_version: String,
    pub trained_at: DateTime<Utc>,
    pub accuracy: f64,

    // Training provenance
    #[serde(default)]
    pub test_size: Option<f64>,
    #[serde(default)]
    pub random_state: Option<u64>,
    #[serde(default)]
    pub n_estimators: Option<usize>,
    #[serde(default)]
    pub samples_trained: Option<usize>,
    #[serde(default)]
    pub samples_tested: Option<usize>,
}

/// The four measurements of one flower, in centimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub sepal_length: f64,
    pub sepal_width: f64,
    pub petal_length: f64,
    pub petal_width: f64,
}

impl FeatureVector {
    pub fn new(sepal_length: f64, sepal_width: f64, petal_length: f64, petal_width: f64) -> Self {
        Self {
            sepal_length,
            sepal_width,
            petal_length,
            petal_width,
        }
    }

    /// Values in dataset column order.
    pub fn to_array(&self) -> [f64; 4] {
        [
            self.sepal_length,
            self.sepal_width,
            self.petal_length,
            self.petal_width,
        ]
    }

    /// Every measurement must lie strictly inside (0, 10).
    pub fn validate(&self) -> Result<()> {
        validate_measurements(&[
            ("sepal_length", self.sepal_length),
            ("sepal_width", self.sepal_width),
            ("petal_length", self.petal_length),
            ("petal_width", self.petal_width),
        ])
    }
}

/// A fitted pipeline together with the metadata captured when it was trained
#[derive(Debug, Clone)]
pub struct TrainedModel {
    pub pipeline: Pipeline,
    pub metadata: ModelMetadata,
}

impl TrainedModel {
    pub fn new(pipeline: Pipeline, metadata: ModelMetadata) -> Result<Self> {
        if metadata.target_names.len() != pipeline.n_classes() {
            return Err(IrisError::Internal(format!(
                "metadata lists {} classes but pipeline predicts {}",
                metadata.target_names.len(),
                pipeline.n_classes()
            )));
        }
        Ok(Self { pipeline, metadata })
    }

    /// Classify one flower. Range checks are the caller's job.
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction> {
        self.predict_raw(&features.to_array())
    }

    /// Classify a raw feature slice; the pipeline rejects a wrong width.
    pub fn predict_raw(&self, features: &[f64]) -> Result<Prediction> {
        let (class, probability) = self.pipeline.predict_row(features)?;
        let species = self
            .metadata
            .target_names
            .get(class)
            .cloned()
            .ok_or_else(|| IrisError::Internal(format!("no label for class {}", class)))?;

        Ok(Prediction {
            species,
            confidence: round4(probability),
            model_version: self.metadata.model_version.clone(),
        })
    }

    pub fn status(&self) -> ModelStatus {
        ModelStatus {
            is_trained: true,
            model_version: Some(self.metadata.model_version.clone()),
            trained_at: Some(self.metadata.trained_at),
            accuracy: Some(self.metadata.accuracy),
        }
    }
}

/// Outcome of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub accuracy: f64,
    pub samples_trained: usize,
    pub samples_tested: usize,
    pub trained_at: DateTime<Utc>,
    pub model_version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub species: String,
    /// Probability of the predicted class, in [0, 1]
    pub confidence: f64,
    pub model_version: String,
}

/// Point-in-time view of the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStatus {
    pub is_trained: bool,
    pub model_version: Option<String>,
    pub trained_at: Option<DateTime<Utc>>,
    pub accuracy: Option<f64>,
}

impl ModelStatus {
    pub fn untrained() -> Self {
        Self {
            is_trained: false,
            model_version: None,
            trained_at: None,
            accuracy: None,
        }
    }
}
