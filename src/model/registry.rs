//! Model lifecycle: train, persist, reload, predict.
//!
//! Holds at most one trained model. Readers clone an `Arc` snapshot under a
//! short read lock, so a prediction always runs against a complete model.
//! Training is serialized by `train_lock` and publishes the new model with a
//! single write-lock swap after both artifacts are on disk.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use super::types::{
    round4, version_from_timestamp, FeatureVector, ModelMetadata, ModelStatus, Prediction,
    TrainedModel, TrainingParams, TrainingSummary,
};
use crate::error::{IrisError, Result};
use crate::ml::{load_reference, stratified_split, ForestParams, Pipeline};
use crate::persistence::ArtifactStore;
use crate::validation::validate_test_size;

pub struct ModelRegistry {
    store: ArtifactStore,
    current: RwLock<Option<Arc<TrainedModel>>>,
    train_lock: Mutex<()>,
}

impl ModelRegistry {
    /// Open the registry on `model_dir`, loading a persisted model if present.
    pub async fn open(model_dir: impl Into<PathBuf>) -> Result<Self> {
        let store = ArtifactStore::new(model_dir);
        store.ensure_dir().await?;

        let current = match store.load().await? {
            Some((pipeline, metadata)) => {
                let model = TrainedModel::new(pipeline, metadata).map_err(|e| {
                    IrisError::Corrupt {
                        path: store.dir().to_path_buf(),
                        reason: e.to_string(),
                    }
                })?;
                info!(
                    "Loaded model {} (accuracy {:.4}) from {}",
                    model.metadata.model_version,
                    model.metadata.accuracy,
                    store.dir().display()
                );
                Some(Arc::new(model))
            }
            None => {
                info!(
                    "No trained model in {}; waiting for a train request",
                    store.dir().display()
                );
                None
            }
        };

        Ok(Self {
            store,
            current: RwLock::new(current),
            train_lock: Mutex::new(()),
        })
    }

    pub async fn is_trained(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Current model, if any. The snapshot stays valid across later retrains.
    pub async fn snapshot(&self) -> Option<Arc<TrainedModel>> {
        self.current.read().await.clone()
    }

    pub async fn status(&self) -> ModelStatus {
        match self.snapshot().await {
            Some(model) => model.status(),
            None => ModelStatus::untrained(),
        }
    }

    pub async fn predict(&self, features: &FeatureVector) -> Result<Prediction> {
        let model = self.snapshot().await.ok_or(IrisError::NotTrained)?;
        let prediction = model.predict(features)?;
        debug!(
            "Predicted {} ({:.4}) with model {}",
            prediction.species, prediction.confidence, prediction.model_version
        );
        Ok(prediction)
    }

    /// Train a fresh model, persist it and make it current.
    ///
    /// On any failure the previously loaded model stays in place.
    pub async fn train(&self, params: TrainingParams) -> Result<TrainingSummary> {
        validate_test_size(params.test_size)?;

        let _guard = self.train_lock.lock().await;
        let started = Instant::now();

        let (model, summary) = tokio::task::spawn_blocking(move || train_model(params))
            .await
            .map_err(|e| IrisError::Internal(format!("training task failed: {}", e)))??;

        self.store.save(&model.pipeline, &model.metadata).await?;
        *self.current.write().await = Some(Arc::new(model));

        info!(
            "Trained model {} (accuracy {:.4}, {} train / {} test) in {:?}",
            summary.model_version,
            summary.accuracy,
            summary.samples_trained,
            summary.samples_tested,
            started.elapsed()
        );
        Ok(summary)
    }
}

/// Fit a model on the reference dataset. Pure apart from reading the clock.
pub fn train_model(params: TrainingParams) -> Result<(TrainedModel, TrainingSummary)> {
    validate_test_size(params.test_size)?;

    let reference = load_reference()?;
    let n_classes = reference.target_names.len();
    let mut rng = StdRng::seed_from_u64(params.random_state);

    let split = stratified_split(&reference.data, n_classes, params.test_size, &mut rng)?;
    let forest_params = ForestParams::default();
    let pipeline = Pipeline::fit(&split.train, n_classes, &forest_params, &mut rng)?;
    let accuracy = round4(pipeline.score(&split.test)?);

    let trained_at = Utc::now();
    let model_version = version_from_timestamp(&trained_at);

    let metadata = ModelMetadata {
        target_names: reference.target_names,
        model_version: model_version.clone(),
        trained_at,
        accuracy,
        test_size: Some(params.test_size),
        random_state: Some(params.random_state),
        n_estimators: Some(forest_params.n_estimators),
        samples_trained: Some(split.train.len()),
        samples_tested: Some(split.test.len()),
    };
    let summary = TrainingSummary {
        accuracy,
        samples_trained: split.train.len(),
        samples_tested: split.test.len(),
        trained_at,
        model_version,
    };

    Ok((TrainedModel::new(pipeline, metadata)?, summary))
}
