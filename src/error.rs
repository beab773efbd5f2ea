use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the classifier service
#[derive(Error, Debug)]
pub enum IrisError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // Authentication errors
    #[error("Authentication error: {0}")]
    Unauthorized(String),

    // Model lifecycle errors
    #[error("Model has not been trained yet. Send a POST request to /model/train first.")]
    NotTrained,

    #[error("Training failed: {0}")]
    Training(String),

    #[error("Corrupt model artifact {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for IrisError
pub type Result<T> = std::result::Result<T, IrisError>;

impl IrisError {
    /// True for errors caused by the caller rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            IrisError::Validation(_) | IrisError::Unauthorized(_) | IrisError::NotTrained
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(IrisError::NotTrained.is_client_error());
        assert!(IrisError::Validation("x".into()).is_client_error());
        assert!(IrisError::Unauthorized("x".into()).is_client_error());
        assert!(!IrisError::Training("x".into()).is_client_error());
        assert!(!IrisError::Internal("x".into()).is_client_error());
    }

    #[test]
    fn test_io_error_converts() {
        let err: IrisError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, IrisError::Io(_)));
        assert!(err.to_string().contains("gone"));
    }
}
