use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default secret shipped with the service. Deployments must override it.
pub const DEFAULT_API_KEY: &str = "change-me-in-production";

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Display name reported by the health endpoint
    pub app_name: String,
    /// Verbose logging for the crate's own targets
    #[serde(default)]
    pub debug: bool,
    /// Directory holding the persisted pipeline and metadata files
    pub model_dir: PathBuf,
    /// Secret expected in the `X-API-Key` header of train requests
    pub api_key: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
    /// Optional directory for a daily rotating log file
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            dir: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "Iris ML API".to_string(),
            debug: false,
            model_dir: PathBuf::from("trained_models"),
            api_key: DEFAULT_API_KEY.to_string(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, files under `config_dir` and the environment
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("app_name", "Iris ML API")?
            .set_default("debug", false)?
            .set_default("model_dir", "trained_models")?
            .set_default("api_key", DEFAULT_API_KEY)?
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("IRIS_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (IRIS_MODEL_DIR, IRIS_SERVER__PORT, etc.)
            .add_source(
                Environment::with_prefix("IRIS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            // Unprefixed names used by existing deployments win last
            .set_override_option("app_name", std::env::var("APP_NAME").ok())?
            .set_override_option("debug", std::env::var("DEBUG").ok())?
            .set_override_option("model_dir", std::env::var("MODEL_DIR").ok())?
            .set_override_option("api_key", std::env::var("API_KEY").ok())?;

        builder.build()?.try_deserialize()
    }

    /// True while the shipped placeholder secret is still in use
    pub fn uses_default_api_key(&self) -> bool {
        self.api_key == DEFAULT_API_KEY
    }

    /// Effective tracing filter directive
    pub fn log_filter(&self) -> String {
        if self.debug {
            "info,iris_api=debug,tower_http=debug".to_string()
        } else {
            self.logging.level.clone()
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.api_key.trim().is_empty() {
            errors.push("api_key must not be empty".to_string());
        }

        if self.model_dir.as_os_str().is_empty() {
            errors.push("model_dir must not be empty".to_string());
        }

        if self.server.port == 0 {
            errors.push("server.port must be non-zero".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
