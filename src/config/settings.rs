//! Application settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub openai: OpenAiConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub styling: StylingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Remote generation service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAiConfig {
    /// Falls back to the `OPENAI_API_KEY` environment variable when empty
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model used by the styling pipeline and image generation
    #[serde(default = "default_model")]
    pub model: String,
    /// Model used by the plain chat endpoint
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4.1".to_string()
}

fn default_chat_model() -> String {
    "gpt-4o".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout() -> u64 {
    180000
}

/// How generated artifacts are named on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactNaming {
    /// `<variant>.png`, rewritten on every run
    #[default]
    Overwrite,
    /// `<variant>_<timestamp>_<id>.png`
    Unique,
}

/// Filesystem layout configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_raw_images_dir")]
    pub raw_images_dir: PathBuf,
    #[serde(default = "default_base64_cache_dir")]
    pub base64_cache_dir: PathBuf,
    #[serde(default = "default_generated_images_dir")]
    pub generated_images_dir: PathBuf,
    #[serde(default)]
    pub artifact_naming: ArtifactNaming,
}

fn default_raw_images_dir() -> PathBuf {
    PathBuf::from("data/images/raw")
}

fn default_base64_cache_dir() -> PathBuf {
    PathBuf::from("data/images/raw_base64")
}

fn default_generated_images_dir() -> PathBuf {
    PathBuf::from("data/images/generated")
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    /// NDJSON file receiving one record per generation call
    #[serde(default = "default_call_log_file")]
    pub call_log_file: PathBuf,
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_call_log_file() -> PathBuf {
    PathBuf::from("logs/default.jsonl")
}

/// Request defaults for the styling endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StylingConfig {
    #[serde(default = "default_season")]
    pub default_season: String,
    #[serde(default = "default_indices")]
    pub default_indices: Vec<usize>,
}

fn default_season() -> String {
    "summer".to_string()
}

fn default_indices() -> Vec<usize> {
    vec![0]
}

impl Settings {
    /// Load settings from configuration files and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/default.toml")
    }

    /// Load settings from a specific configuration file path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("openai.base_url", default_base_url())?
            .set_default("openai.model", default_model())?
            .set_default("openai.chat_model", default_chat_model())?
            .set_default("openai.temperature", f64::from(default_temperature()))?
            .set_default("openai.timeout_ms", default_timeout() as i64)?
            .set_default("storage.raw_images_dir", "data/images/raw")?
            .set_default("storage.base64_cache_dir", "data/images/raw_base64")?
            .set_default("storage.generated_images_dir", "data/images/generated")?
            .set_default("storage.artifact_naming", "overwrite")?
            .set_default("logging.level", default_log_level())?
            .set_default("logging.format", default_log_format())?
            .set_default("logging.call_log_file", "logs/default.jsonl")?
            .set_default("styling.default_season", default_season())?
            .set_default("styling.default_indices", vec![0_i64])?
            // Load from configuration file
            .add_source(File::with_name(path.as_ref().to_str().unwrap_or("config/default")).required(false))
            // Override with environment variables (prefixed with SNAPCLOSET_)
            .add_source(
                Environment::with_prefix("SNAPCLOSET")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = config.try_deserialize()?;
        if settings.openai.api_key.is_empty() {
            settings.openai.api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
        }
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Config(config::ConfigError::Message(
                "Server port cannot be 0".to_string(),
            )));
        }

        if self.openai.model.trim().is_empty() {
            return Err(AppError::Config(config::ConfigError::Message(
                "Model identifier cannot be empty".to_string(),
            )));
        }

        if !(0.0..=2.0).contains(&self.openai.temperature) {
            return Err(AppError::Config(config::ConfigError::Message(format!(
                "Temperature {} is outside the range 0.0..=2.0",
                self.openai.temperature
            ))));
        }

        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            openai: OpenAiConfig {
                api_key: String::new(),
                base_url: default_base_url(),
                model: default_model(),
                chat_model: default_chat_model(),
                temperature: default_temperature(),
                timeout_ms: default_timeout(),
            },
            storage: StorageConfig {
                raw_images_dir: default_raw_images_dir(),
                base64_cache_dir: default_base64_cache_dir(),
                generated_images_dir: default_generated_images_dir(),
                artifact_naming: ArtifactNaming::default(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                format: default_log_format(),
                call_log_file: default_call_log_file(),
            },
            styling: StylingConfig {
                default_season: default_season(),
                default_indices: default_indices(),
            },
        }
    }
}
