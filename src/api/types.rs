use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{ModelStatus, Prediction, TrainingParams, TrainingSummary};

// ============================================================================
// Training Types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct TrainRequest {
    #[serde(default = "default_test_size")]
    pub test_size: f64,
    #[serde(default = "default_random_state")]
    pub random_state: u64,
}

fn default_test_size() -> f64 {
    TrainingParams::default().test_size
}

fn default_random_state() -> u64 {
    TrainingParams::default().random_state
}

impl Default for TrainRequest {
    fn default() -> Self {
        Self {
            test_size: default_test_size(),
            random_state: default_random_state(),
        }
    }
}

impl From<TrainRequest> for TrainingParams {
    fn from(req: TrainRequest) -> Self {
        Self {
            test_size: req.test_size,
            random_state: req.random_state,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainResponse {
    pub message: String,
    pub accuracy: f64,
    pub samples_trained: usize,
    pub samples_tested: usize,
    pub trained_at: DateTime<Utc>,
}

impl From<TrainingSummary> for TrainResponse {
    fn from(summary: TrainingSummary) -> Self {
        Self {
            message: "Model trained successfully".to_string(),
            accuracy: summary.accuracy,
            samples_trained: summary.samples_trained,
            samples_tested: summary.samples_tested,
            trained_at: summary.trained_at,
        }
    }
}

// ============================================================================
// Prediction Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub predicted_species: String,
    pub confidence: f64,
    pub model_version: String,
}

impl From<Prediction> for PredictResponse {
    fn from(p: Prediction) -> Self {
        Self {
            predicted_species: p.species,
            confidence: p.confidence,
            model_version: p.model_version,
        }
    }
}

// ============================================================================
// Status Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub is_trained: bool,
    pub model_version: Option<String>,
    pub trained_at: Option<DateTime<Utc>>,
    pub accuracy: Option<f64>,
}

impl From<ModelStatus> for StatusResponse {
    fn from(s: ModelStatus) -> Self {
        Self {
            is_trained: s.is_trained,
            model_version: s.model_version,
            trained_at: s.trained_at,
            accuracy: s.accuracy,
        }
    }
}

// ============================================================================
// Health Check Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub app_name: String,
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
