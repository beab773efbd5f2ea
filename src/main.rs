use anyhow::Context;
use clap::Parser;
use iris_api::api::{create_router, AppState};
use iris_api::cli::{self, Cli, Commands};
use iris_api::config::AppConfig;
use iris_api::model::{FeatureVector, ModelRegistry, TrainingParams};
use tokio::signal;
use tracing::{error, info, warn};

mod main_runtime;

use main_runtime::{init_logging, init_logging_simple};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config_dir)?;

    match cli.command.clone().unwrap_or(Commands::Serve) {
        Commands::Serve => {
            init_logging(&config);
            run_server(config).await?;
        }
        Commands::Train {
            test_size,
            random_state,
        } => {
            init_logging_simple();
            let registry = ModelRegistry::open(config.model_dir.clone()).await?;
            cli::run_train(
                &registry,
                TrainingParams {
                    test_size,
                    random_state,
                },
            )
            .await?;
        }
        Commands::Status => {
            init_logging_simple();
            let registry = ModelRegistry::open(config.model_dir.clone()).await?;
            cli::show_status(&registry).await?;
        }
        Commands::Predict {
            sepal_length,
            sepal_width,
            petal_length,
            petal_width,
        } => {
            init_logging_simple();
            let registry = ModelRegistry::open(config.model_dir.clone()).await?;
            let features = FeatureVector::new(sepal_length, sepal_width, petal_length, petal_width);
            cli::run_predict(&registry, features).await?;
        }
    }

    Ok(())
}

fn load_config(config_dir: &str) -> anyhow::Result<AppConfig> {
    let config = AppConfig::load_from(config_dir)
        .with_context(|| format!("failed to load configuration from {}", config_dir))?;
    if let Err(errors) = config.validate() {
        anyhow::bail!("invalid configuration: {}", errors.join("; "));
    }
    Ok(config)
}

async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    if config.uses_default_api_key() {
        warn!("API key is the shipped default; set API_KEY before exposing this service");
    }

    let addr = config.server.bind_addr();
    let state = AppState::open(config)
        .await
        .context("failed to open model registry")?;
    let app = create_router(state.clone());

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(
        "{} listening on http://{} (model dir: {}, trained: {})",
        state.config.app_name,
        addr,
        state.config.model_dir.display(),
        state.registry.is_trained().await
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped after {}s", state.uptime_seconds());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
