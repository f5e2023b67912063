use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Dataset ingestion configuration
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Model training configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (ASSET_OWNER__<SECTION>__<KEY>)
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
    }

    /// Environment source; list-valued keys take comma separated values
    fn environment() -> config::Environment {
        config::Environment::with_prefix("ASSET_OWNER")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("dataset.encodings")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            dataset: DatasetConfig::default(),
            model: ModelConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Maximum accepted upload size (bytes)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Dataset trained on at startup; the server refuses to start without it
    #[serde(default = "default_startup_path")]
    pub startup_path: PathBuf,

    /// Directory uploaded datasets are saved into
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Candidate text encodings, tried in order
    #[serde(default = "default_encodings")]
    pub encodings: Vec<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            startup_path: default_startup_path(),
            upload_dir: default_upload_dir(),
            encodings: default_encodings(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Trees per random forest
    #[serde(default = "default_n_trees")]
    pub n_trees: u16,

    /// Seed shared by the train/test split and both forests
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Fraction of rows held out from training
    #[serde(default = "default_test_size")]
    pub test_size: f64,

    /// Shortest hostname n-gram
    #[serde(default = "default_ngram_min")]
    pub ngram_min: usize,

    /// Longest hostname n-gram
    #[serde(default = "default_ngram_max")]
    pub ngram_max: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_trees: default_n_trees(),
            seed: default_seed(),
            test_size: default_test_size(),
            ngram_min: default_ngram_min(),
            ngram_max: default_ngram_max(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,

    /// Service name
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable Prometheus metrics
    #[serde(default = "default_true")]
    pub prometheus_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            service_name: default_service_name(),
            prometheus_enabled: default_true(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    5000
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_startup_path() -> PathBuf {
    PathBuf::from("sample_data.csv")
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_encodings() -> Vec<String> {
    vec!["utf-8".to_string(), "windows-1252".to_string()]
}

fn default_n_trees() -> u16 {
    100
}

fn default_seed() -> u64 {
    42
}

fn default_test_size() -> f64 {
    0.2
}

fn default_ngram_min() -> usize {
    2
}

fn default_ngram_max() -> usize {
    4
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "asset-owner-predictor".to_string()
}

fn default_true() -> bool {
    true
}
