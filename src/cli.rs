use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::api::types::{PredictResponse, StatusResponse, TrainResponse};
use crate::error::{IrisError, Result};
use crate::model::{FeatureVector, ModelRegistry, TrainingParams};

#[derive(Parser, Debug)]
#[command(name = "iris-api")]
#[command(version)]
#[command(about = "Iris flower classifier: train, persist and serve predictions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding default.toml and per-environment config files
    #[arg(short, long, default_value = "config", env = "IRIS_CONFIG_DIR")]
    pub config_dir: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve,
    /// Train a model once and persist it to the model directory
    Train {
        /// Fraction of samples held out for evaluation, in (0, 1)
        #[arg(long, default_value = "0.2")]
        test_size: f64,
        /// Seed for the split and the forest
        #[arg(long, default_value = "42")]
        random_state: u64,
    },
    /// Show the status of the persisted model
    Status,
    /// Classify one flower with the persisted model
    Predict {
        /// Sepal length in cm
        sepal_length: f64,
        /// Sepal width in cm
        sepal_width: f64,
        /// Petal length in cm
        petal_length: f64,
        /// Petal width in cm
        petal_width: f64,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Train, persist and print the training summary
pub async fn run_train(registry: &ModelRegistry, params: TrainingParams) -> Result<TrainResponse> {
    let summary = registry.train(params).await?;
    let response = TrainResponse::from(summary);
    print_json(&response)?;
    Ok(response)
}

/// Print the status of whatever model the registry loaded
pub async fn show_status(registry: &ModelRegistry) -> Result<StatusResponse> {
    let response = StatusResponse::from(registry.status().await);
    print_json(&response)?;
    Ok(response)
}

/// Validate, classify and print one flower
pub async fn run_predict(
    registry: &ModelRegistry,
    features: FeatureVector,
) -> Result<PredictResponse> {
    features.validate()?;
    let prediction = registry.predict(&features).await.map_err(|e| match e {
        IrisError::NotTrained => IrisError::Validation(
            "no trained model found; run `iris-api train` first".to_string(),
        ),
        other => other,
    })?;
    let response = PredictResponse::from(prediction);
    print_json(&response)?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::parse_from(["iris-api"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.config_dir, "config");
    }

    #[test]
    fn test_train_args() {
        let cli = Cli::parse_from(["iris-api", "train", "--test-size", "0.3", "--random-state", "7"]);
        assert_eq!(
            cli.command,
            Some(Commands::Train {
                test_size: 0.3,
                random_state: 7
            })
        );
    }

    #[test]
    fn test_predict_args() {
        let cli = Cli::parse_from(["iris-api", "predict", "5.1", "3.5", "1.4", "0.2"]);
        assert_eq!(
            cli.command,
            Some(Commands::Predict {
                sepal_length: 5.1,
                sepal_width: 3.5,
                petal_length: 1.4,
                petal_width: 0.2
            })
        );
    }
}
