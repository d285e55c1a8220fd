//! Single-call chat, image generation and outfit matching

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::backend::traits::{ContentBlock, GenerationClient, GenerationPayload, InputMessage, Tool};
use crate::call_log::{CallInput, CallLogger, CallOutput, LogEntry};
use crate::config::Settings;
use crate::error::{AppError, Result};
use crate::images::{Base64Cache, ImageResource, ImageSelector};
use crate::response::{base64, ArtifactStore, ProcessedOutput, ResponseHandler};

const STYLIST_INSTRUCTIONS: &str = "You are a helpful fashion stylist.";
const REFERENCE_INTRO: &str = "This is the reference outfit:";
const MATCH_INSTRUCTIONS: &str =
    "Please review the other outfits and pick one that complements the reference outfit the most.";

/// Body of the chat and image endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

/// Body of the outfit matching endpoint, indices into the closet listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutfitRequest {
    pub reference_index: usize,
    pub candidate_indices: Vec<usize>,
}

/// The stylist's pick among the candidates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchOutput {
    #[serde(rename = "match")]
    pub choice: String,
}

/// Result of a single generation call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectOutput {
    pub text: Vec<String>,
    pub images: Vec<String>,
}

/// Issues one generation call per request, without caching
pub struct DirectGenerator {
    selector: ImageSelector,
    cache: Arc<Base64Cache>,
    client: Arc<dyn GenerationClient>,
    call_log: Arc<dyn CallLogger>,
    responses: ResponseHandler,
    chat_model: String,
    image_model: String,
    temperature: f32,
}

impl DirectGenerator {
    pub fn new(
        settings: &Settings,
        client: Arc<dyn GenerationClient>,
        call_log: Arc<dyn CallLogger>,
        cache: Arc<Base64Cache>,
    ) -> Self {
        Self {
            selector: ImageSelector::new(&settings.storage.raw_images_dir),
            cache,
            client,
            call_log,
            responses: ResponseHandler::new(ArtifactStore::new(
                &settings.storage.generated_images_dir,
                settings.storage.artifact_naming,
            )),
            chat_model: settings.openai.chat_model.clone(),
            image_model: settings.openai.model.clone(),
            temperature: settings.openai.temperature,
        }
    }

    /// Text-only answer from the stylist persona
    pub async fn chat(&self, prompt: &str) -> Result<DirectOutput> {
        ensure_prompt(prompt)?;
        let payload = GenerationPayload {
            model: self.chat_model.clone(),
            input: vec![
                stylist_message(),
                InputMessage::user(vec![ContentBlock::InputText {
                    text: prompt.to_string(),
                }]),
            ],
            tools: vec![],
            temperature: Some(self.temperature),
        };
        self.call(prompt_input("chat", prompt, vec![]), payload).await
    }

    /// Ask the stylist which candidate outfit best complements the reference.
    ///
    /// Out-of-range candidate indices are skipped like elsewhere, but the
    /// reference must exist and at least one candidate must remain.
    pub async fn match_outfit(&self, request: &MatchOutfitRequest) -> Result<MatchOutput> {
        let available = self.selector.list().await?;
        let reference = available.get(request.reference_index).cloned().ok_or_else(|| {
            AppError::InvalidRequest(format!(
                "Reference index {} is out of range ({} images available)",
                request.reference_index,
                available.len()
            ))
        })?;
        let candidates: Vec<ImageResource> = request
            .candidate_indices
            .iter()
            .filter_map(|&i| available.get(i).cloned())
            .collect();
        if candidates.is_empty() {
            return Err(AppError::InvalidRequest(
                "No candidate outfits within range".to_string(),
            ));
        }

        info!(
            reference = %reference.stem(),
            candidates = candidates.len(),
            "Outfit match requested"
        );

        let mut content = vec![
            ContentBlock::InputText {
                text: REFERENCE_INTRO.to_string(),
            },
            self.image_block(&reference).await?,
            ContentBlock::InputText {
                text: MATCH_INSTRUCTIONS.to_string(),
            },
        ];
        for candidate in &candidates {
            content.push(self.image_block(candidate).await?);
        }

        let payload = GenerationPayload {
            model: self.chat_model.clone(),
            input: vec![stylist_message(), InputMessage::user(content)],
            tools: vec![],
            temperature: Some(self.temperature),
        };
        let stems = std::iter::once(&reference)
            .chain(candidates.iter())
            .map(|i| i.stem().to_string())
            .collect();
        let prompt = format!("{}\n{}", REFERENCE_INTRO, MATCH_INSTRUCTIONS);

        let output = self
            .call(prompt_input("match-outfit", &prompt, stems), payload)
            .await?;
        Ok(MatchOutput {
            choice: output.text.join("\n"),
        })
    }

    /// Generate images for a prompt, saved under timestamped names
    pub async fn generate_image(&self, prompt: &str) -> Result<DirectOutput> {
        ensure_prompt(prompt)?;
        let payload = GenerationPayload {
            model: self.image_model.clone(),
            input: vec![InputMessage::user(vec![ContentBlock::InputText {
                text: prompt.to_string(),
            }])],
            tools: vec![Tool::ImageGeneration],
            temperature: Some(self.temperature),
        };
        let output = self
            .call(prompt_input("generate-image", prompt, vec![]), payload)
            .await?;
        if output.images.is_empty() {
            return Err(AppError::GenerationFailed(
                "Response contained no generated image".to_string(),
            ));
        }
        Ok(output)
    }

    async fn image_block(&self, image: &ImageResource) -> Result<ContentBlock> {
        let encoded = self.cache.encode(image).await?;
        Ok(ContentBlock::InputImage {
            image_url: base64::data_url(image.media_type(), &encoded),
        })
    }

    async fn call(&self, input: CallInput, payload: GenerationPayload) -> Result<DirectOutput> {
        let endpoint = input.endpoint.clone();
        let model = payload.model.clone();

        let started = Instant::now();
        let generated = self.client.generate(payload).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        let (processed, response) = match generated {
            Ok(response) => {
                let processed = self
                    .responses
                    .process_timestamped(&response, "generated_image")
                    .await;
                (processed, Some(response))
            }
            Err(e) => (Err(e), None),
        };

        let entry = LogEntry {
            timestamp: Utc::now(),
            input,
            output: match &processed {
                Ok(out) => CallOutput::Success {
                    texts: out.texts.clone(),
                    images: paths(out),
                },
                Err(e) => CallOutput::Failure {
                    error: e.to_string(),
                },
            },
            model: response
                .as_ref()
                .and_then(|r| r.model.clone())
                .unwrap_or(model),
            response_id: response.as_ref().and_then(|r| r.id.clone()),
            usage: response.and_then(|r| r.usage),
            duration_ms,
        };
        if let Err(e) = self.call_log.log(&entry).await {
            warn!(endpoint = %endpoint, error = %e, "Failed to write call log entry");
        }

        let processed = processed?;
        Ok(DirectOutput {
            images: paths(&processed),
            text: processed.texts,
        })
    }
}

fn ensure_prompt(prompt: &str) -> Result<()> {
    if prompt.trim().is_empty() {
        return Err(AppError::InvalidRequest("Prompt cannot be empty".to_string()));
    }
    Ok(())
}

fn stylist_message() -> InputMessage {
    InputMessage {
        role: "system".to_string(),
        content: vec![ContentBlock::InputText {
            text: STYLIST_INSTRUCTIONS.to_string(),
        }],
    }
}

fn prompt_input(endpoint: &str, prompt: &str, images: Vec<String>) -> CallInput {
    CallInput {
        endpoint: endpoint.to_string(),
        season: None,
        variant: None,
        images,
        prompt: prompt.to_string(),
    }
}

fn paths(output: &ProcessedOutput) -> Vec<String> {
    output
        .images
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect()
}
