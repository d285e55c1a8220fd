//! Shared fixtures for functional tests

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use snapcloset_backend::backend::traits::{
    GenerationClient, GenerationPayload, GenerationResponse, MessageContent, OutputBlock,
};
use snapcloset_backend::config::{ArtifactNaming, Settings};
use snapcloset_backend::error::{AppError, Result};
use std::path::Path;
use std::sync::Mutex;

/// Base64 of an 8-byte PNG signature
pub const PNG_B64: &str = "iVBORw0KGgo=";

/// Generation client that records payloads and answers from a closure
pub struct StubClient {
    calls: Mutex<Vec<GenerationPayload>>,
    respond: Box<dyn Fn(usize, &GenerationPayload) -> Result<GenerationResponse> + Send + Sync>,
}

impl StubClient {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(usize, &GenerationPayload) -> Result<GenerationResponse> + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// Answers every call with one text block and one image
    pub fn outfit() -> Self {
        Self::new(|i, _| Ok(outfit_response(i)))
    }

    pub fn calls(&self) -> Vec<GenerationPayload> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationClient for StubClient {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate(&self, payload: GenerationPayload) -> Result<GenerationResponse> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(payload.clone());
            calls.len() - 1
        };
        (self.respond)(index, &payload)
    }
}

pub fn outfit_response(i: usize) -> GenerationResponse {
    GenerationResponse {
        id: Some(format!("resp_{}", i)),
        model: Some("gpt-4.1-stub".to_string()),
        usage: Some(json!({"input_tokens": 10, "output_tokens": 20})),
        output: vec![
            OutputBlock::Message {
                content: vec![MessageContent::OutputText {
                    text: "Here is a cozy outfit".to_string(),
                }],
            },
            OutputBlock::ImageGenerationCall {
                result: Some(PNG_B64.to_string()),
            },
        ],
    }
}

pub fn backend_error(message: &str) -> AppError {
    AppError::BackendError(message.to_string())
}

/// Settings rooted in a temp directory with one raw image
pub fn settings_in(root: &Path) -> Settings {
    let mut settings = Settings::default();
    settings.storage.raw_images_dir = root.join("raw");
    settings.storage.base64_cache_dir = root.join("raw_base64");
    settings.storage.generated_images_dir = root.join("generated");
    settings.storage.artifact_naming = ArtifactNaming::Overwrite;
    settings.logging.call_log_file = root.join("logs").join("calls.jsonl");

    std::fs::create_dir_all(root.join("raw")).unwrap();
    std::fs::write(root.join("raw").join("sweater.jpg"), b"\xFF\xD8\xFFsweater").unwrap();
    settings
}

pub fn log_lines(settings: &Settings) -> Vec<serde_json::Value> {
    match std::fs::read_to_string(&settings.logging.call_log_file) {
        Ok(contents) => contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect(),
        Err(_) => vec![],
    }
}
