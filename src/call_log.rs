//! Append-only NDJSON record of generation calls

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::error::Result;

/// What was sent to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallInput {
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub prompt: String,
}

/// What came back, or why nothing did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CallOutput {
    Success {
        texts: Vec<String>,
        images: Vec<String>,
    },
    Failure {
        error: String,
    },
}

/// One line of the call log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub input: CallInput,
    pub output: CallOutput,
    pub model: String,
    pub response_id: Option<String>,
    pub usage: Option<Value>,
    /// Wall-clock time spent in the generation call
    pub duration_ms: u64,
}

/// Sink for call records
#[async_trait]
pub trait CallLogger: Send + Sync {
    async fn log(&self, entry: &LogEntry) -> Result<()>;
}

/// Appends entries to a newline-delimited JSON file
pub struct JsonlCallLogger {
    path: PathBuf,
}

impl JsonlCallLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CallLogger for JsonlCallLogger {
    async fn log(&self, entry: &LogEntry) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}
