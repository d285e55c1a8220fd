//! Request/response contract of the remote generation service

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// One content block of an input message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    InputText { text: String },
    /// `image_url` carries a `data:<mime>;base64,<data>` URL
    InputImage { image_url: String },
}

/// Message sent to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputMessage {
    pub role: String,
    pub content: Vec<ContentBlock>,
}

impl InputMessage {
    pub fn user(content: Vec<ContentBlock>) -> Self {
        Self {
            role: "user".to_string(),
            content,
        }
    }
}

/// Server-side capability requested alongside text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tool {
    ImageGeneration,
}

/// Multimodal request for one generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationPayload {
    pub model: String,
    pub input: Vec<InputMessage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl GenerationPayload {
    /// Text of every input text block, in order
    pub fn prompt_texts(&self) -> Vec<&str> {
        self.input
            .iter()
            .flat_map(|m| m.content.iter())
            .filter_map(|block| match block {
                ContentBlock::InputText { text } => Some(text.as_str()),
                ContentBlock::InputImage { .. } => None,
            })
            .collect()
    }

    /// Number of image blocks across all messages
    pub fn image_count(&self) -> usize {
        self.input
            .iter()
            .flat_map(|m| m.content.iter())
            .filter(|block| matches!(block, ContentBlock::InputImage { .. }))
            .count()
    }
}

/// Nested item of a `message` output block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageContent {
    OutputText { text: String },
    #[serde(other)]
    Other,
}

/// One block of the response output sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputBlock {
    Message {
        #[serde(default)]
        content: Vec<MessageContent>,
    },
    ImageGenerationCall {
        /// Base64-encoded image; absent while the call is still in progress
        #[serde(default)]
        result: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

/// Response of one generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub usage: Option<Value>,
    #[serde(default)]
    pub output: Vec<OutputBlock>,
}

/// Capability to call a multimodal generation model
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Get the client name
    fn name(&self) -> &str;

    /// Run one generation call
    async fn generate(&self, payload: GenerationPayload) -> Result<GenerationResponse>;
}
