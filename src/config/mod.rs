//! Configuration module

pub mod settings;

pub use settings::{
    ArtifactNaming, LoggingConfig, OpenAiConfig, ServerConfig, Settings, StorageConfig,
    StylingConfig,
};
