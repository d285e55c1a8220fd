//! Styling-advice pipeline: select, encode, generate per variant, persist, log

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::backend::traits::{GenerationClient, GenerationPayload, GenerationResponse};
use crate::call_log::{CallInput, CallLogger, CallOutput, LogEntry};
use crate::config::{Settings, StylingConfig};
use crate::error::Result;
use crate::images::{Base64Cache, ImageSelector};
use crate::response::{ArtifactStore, ProcessedOutput, ResponseHandler};
use crate::styling::prompt::{EncodedImage, PromptBuilder, StyleVariant};

/// Body of a styling-advice request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StylingRequest {
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub selected_images_indices: Option<Vec<usize>>,
}

impl StylingRequest {
    /// Fill missing fields from the configured defaults
    pub fn resolve(self, defaults: &StylingConfig) -> (String, Vec<usize>) {
        (
            self.season.unwrap_or_else(|| defaults.default_season.clone()),
            self.selected_images_indices
                .unwrap_or_else(|| defaults.default_indices.clone()),
        )
    }
}

/// A variant that produced no result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantError {
    pub variant: String,
    pub error: String,
}

/// Aggregate result over all variants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StylingAdvice {
    pub text: Vec<String>,
    pub images: Vec<String>,
    #[serde(default)]
    pub errors: Vec<VariantError>,
    /// Number of variants whose call and processing succeeded
    #[serde(default)]
    pub succeeded: usize,
}

impl StylingAdvice {
    /// True when at least one variant ran and every variant that ran failed
    pub fn all_failed(&self) -> bool {
        !self.errors.is_empty() && self.succeeded == 0
    }
}

/// Runs every style variant for a set of closet images
pub struct StylingPipeline {
    selector: ImageSelector,
    cache: Arc<Base64Cache>,
    prompts: PromptBuilder,
    client: Arc<dyn GenerationClient>,
    responses: ResponseHandler,
    call_log: Arc<dyn CallLogger>,
}

impl StylingPipeline {
    pub fn new(
        settings: &Settings,
        client: Arc<dyn GenerationClient>,
        call_log: Arc<dyn CallLogger>,
    ) -> Self {
        let cache = Arc::new(Base64Cache::new(&settings.storage.base64_cache_dir));
        Self::with_cache(settings, client, call_log, cache)
    }

    /// Build a pipeline sharing an existing base64 cache
    pub fn with_cache(
        settings: &Settings,
        client: Arc<dyn GenerationClient>,
        call_log: Arc<dyn CallLogger>,
        cache: Arc<Base64Cache>,
    ) -> Self {
        let storage = &settings.storage;
        Self {
            selector: ImageSelector::new(&storage.raw_images_dir),
            cache,
            prompts: PromptBuilder::new(&settings.openai.model, settings.openai.temperature),
            client,
            responses: ResponseHandler::new(ArtifactStore::new(
                &storage.generated_images_dir,
                storage.artifact_naming,
            )),
            call_log,
        }
    }

    /// Generate advice for every variant.
    ///
    /// Selection and encoding errors abort the run. A failing variant is
    /// logged and reported in `errors`, and the remaining variants still run.
    pub async fn run(&self, season: &str, indices: &[usize]) -> Result<StylingAdvice> {
        let images = self.selector.select(indices).await?;
        let stems: Vec<String> = images.iter().map(|i| i.stem().to_string()).collect();

        let mut encoded = Vec::with_capacity(images.len());
        for image in &images {
            encoded.push(EncodedImage {
                media_type: image.media_type().to_string(),
                data: self.cache.encode(image).await?,
            });
        }

        info!(
            season = %season,
            requested = indices.len(),
            images = images.len(),
            variants = self.prompts.variants().len(),
            "Starting styling run"
        );

        let mut advice = StylingAdvice::default();
        for (variant, payload) in self.prompts.build(season, &encoded) {
            let input = CallInput {
                endpoint: "styling-advice".to_string(),
                season: Some(season.to_string()),
                variant: Some(variant.to_string()),
                images: stems.clone(),
                prompt: payload.prompt_texts().join("\n"),
            };

            let (outcome, response, duration_ms) = self.run_variant(variant, payload).await;
            let output = match outcome {
                Ok(processed) => {
                    info!(
                        variant = %variant,
                        texts = processed.texts.len(),
                        images = processed.images.len(),
                        "Variant completed"
                    );
                    advice.succeeded += 1;
                    let images: Vec<String> = processed
                        .images
                        .iter()
                        .map(|p| p.to_string_lossy().into_owned())
                        .collect();
                    advice.text.extend(processed.texts.iter().cloned());
                    advice.images.extend(images.iter().cloned());
                    CallOutput::Success {
                        texts: processed.texts,
                        images,
                    }
                }
                Err(e) => {
                    warn!(variant = %variant, error = %e, "Variant failed");
                    advice.errors.push(VariantError {
                        variant: variant.to_string(),
                        error: e.to_string(),
                    });
                    CallOutput::Failure {
                        error: e.to_string(),
                    }
                }
            };

            let entry = LogEntry {
                timestamp: Utc::now(),
                input,
                output,
                model: response
                    .as_ref()
                    .and_then(|r| r.model.clone())
                    .unwrap_or_else(|| self.prompts.model().to_string()),
                response_id: response.as_ref().and_then(|r| r.id.clone()),
                usage: response.and_then(|r| r.usage),
                duration_ms,
            };
            if let Err(e) = self.call_log.log(&entry).await {
                warn!(variant = %variant, error = %e, "Failed to write call log entry");
            }
        }

        Ok(advice)
    }

    /// One generation attempt; the response is returned even when processing it fails
    async fn run_variant(
        &self,
        variant: StyleVariant,
        payload: GenerationPayload,
    ) -> (Result<ProcessedOutput>, Option<GenerationResponse>, u64) {
        let started = Instant::now();
        let generated = self.client.generate(payload).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        let response = match generated {
            Ok(response) => response,
            Err(e) => return (Err(e), None, duration_ms),
        };
        let processed = self.responses.process(&response, variant.as_str()).await;
        (processed, Some(response), duration_ms)
    }
}
