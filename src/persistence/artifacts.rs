//! Artifact Store
//!
//! Keeps the trained pipeline and its metadata as two JSON files inside the
//! model directory. Both are rewritten on every training run:
//! - pipeline first, then metadata
//! - no temp files or renames; a crash in between leaves a mismatched pair,
//!   which surfaces as a load error on the next startup

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{IrisError, Result};
use crate::ml::Pipeline;
use crate::model::ModelMetadata;

pub const MODEL_FILE: &str = "iris_model.json";
pub const METADATA_FILE: &str = "iris_metadata.json";

/// Filesystem locations of the persisted model pair
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
    model_path: PathBuf,
    metadata_path: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            model_path: dir.join(MODEL_FILE),
            metadata_path: dir.join(METADATA_FILE),
            dir,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    /// Create the model directory if needed
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Whether a pipeline file is present (metadata is not checked)
    pub async fn exists(&self) -> Result<bool> {
        Ok(tokio::fs::try_exists(&self.model_path).await?)
    }

    /// Write pipeline then metadata, replacing any previous pair
    pub async fn save(&self, pipeline: &Pipeline, metadata: &ModelMetadata) -> Result<()> {
        self.ensure_dir().await?;

        let pipeline_bytes = serde_json::to_vec(pipeline)?;
        let metadata_bytes = serde_json::to_vec_pretty(metadata)?;

        tokio::fs::write(&self.model_path, pipeline_bytes).await?;
        tokio::fs::write(&self.metadata_path, metadata_bytes).await?;

        info!(
            "Saved model {} to {}",
            metadata.model_version,
            self.dir.display()
        );
        Ok(())
    }

    /// Read the persisted pair, or `None` when no pipeline file exists
    pub async fn load(&self) -> Result<Option<(Pipeline, ModelMetadata)>> {
        if !self.exists().await? {
            debug!("No pipeline at {}", self.model_path.display());
            return Ok(None);
        }

        let pipeline_bytes = tokio::fs::read(&self.model_path).await?;
        let pipeline: Pipeline =
            serde_json::from_slice(&pipeline_bytes).map_err(|e| IrisError::Corrupt {
                path: self.model_path.clone(),
                reason: e.to_string(),
            })?;

        let metadata_bytes = match tokio::fs::read(&self.metadata_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(IrisError::Corrupt {
                    path: self.metadata_path.clone(),
                    reason: "metadata file missing next to pipeline".to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        let metadata: ModelMetadata =
            serde_json::from_slice(&metadata_bytes).map_err(|e| IrisError::Corrupt {
                path: self.metadata_path.clone(),
                reason: e.to_string(),
            })?;

        Ok(Some((pipeline, metadata)))
    }
}
