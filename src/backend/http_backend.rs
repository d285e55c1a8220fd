//! HTTP client for the Responses-style generation API

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use crate::backend::traits::{GenerationClient, GenerationPayload, GenerationResponse};
use crate::config::OpenAiConfig;
use crate::error::{AppError, Result};

/// Generation client talking to `{base_url}/responses` over HTTP
pub struct HttpGenerationClient {
    name: String,
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpGenerationClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            name: "openai".to_string(),
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn responses_url(&self) -> String {
        format!("{}/responses", self.base_url)
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, payload: GenerationPayload) -> Result<GenerationResponse> {
        let url = self.responses_url();

        debug!(
            client = %self.name,
            url = %url,
            model = %payload.model,
            images = payload.image_count(),
            "Sending generation request"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(format!("Request to {} timed out", url))
                } else {
                    AppError::HttpClient(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(client = %self.name, status = %status, "Generation request rejected");
            return Err(AppError::BackendError(format!(
                "Backend returned {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let parsed: GenerationResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::BackendError(format!("Failed to parse response: {}", e)))?;

        debug!(
            client = %self.name,
            response_id = parsed.id.as_deref().unwrap_or("-"),
            blocks = parsed.output.len(),
            "Received generation response"
        );

        Ok(parsed)
    }
}
