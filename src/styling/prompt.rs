//! Style variants and per-variant payload construction

use std::fmt;

use crate::backend::traits::{ContentBlock, GenerationPayload, InputMessage, Tool};
use crate::response::base64;

/// Prompt sent for every variant; `{style}` and `{season}` are substituted
pub const STYLING_TEMPLATE: &str = "Generate flat lay outfit ideas with a {style} vibe for {season}. \
Use all provided items if any. Lighting should be soft and natural.";

/// Style category driving one generation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleVariant {
    Casual,
    Edgy,
    Preppy,
    Cute,
}

impl StyleVariant {
    /// Every variant, in the order the pipeline runs them
    pub const ALL: [StyleVariant; 4] = [
        StyleVariant::Casual,
        StyleVariant::Edgy,
        StyleVariant::Preppy,
        StyleVariant::Cute,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleVariant::Casual => "casual",
            StyleVariant::Edgy => "edgy",
            StyleVariant::Preppy => "preppy",
            StyleVariant::Cute => "cute",
        }
    }
}

impl fmt::Display for StyleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source image ready to embed in a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub media_type: String,
    pub data: String,
}

/// Fill the styling template for one season and variant
pub fn render_prompt(season: &str, variant: StyleVariant) -> String {
    STYLING_TEMPLATE
        .replace("{style}", variant.as_str())
        .replace("{season}", season)
}

/// Builds one payload per style variant
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    model: String,
    temperature: f32,
    variants: Vec<StyleVariant>,
}

impl PromptBuilder {
    pub fn new(model: impl Into<String>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            temperature,
            variants: StyleVariant::ALL.to_vec(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn variants(&self) -> &[StyleVariant] {
        &self.variants
    }

    /// Payload for a single variant: the prompt text, then one image block per input
    pub fn build_one(&self, season: &str, variant: StyleVariant, images: &[EncodedImage]) -> GenerationPayload {
        let mut content = Vec::with_capacity(images.len() + 1);
        content.push(ContentBlock::InputText {
            text: render_prompt(season, variant),
        });
        content.extend(images.iter().map(|image| ContentBlock::InputImage {
            image_url: base64::data_url(&image.media_type, &image.data),
        }));

        GenerationPayload {
            model: self.model.clone(),
            input: vec![InputMessage::user(content)],
            tools: vec![Tool::ImageGeneration],
            temperature: Some(self.temperature),
        }
    }

    /// One payload per variant, in variant order
    pub fn build(&self, season: &str, images: &[EncodedImage]) -> Vec<(StyleVariant, GenerationPayload)> {
        self.variants
            .iter()
            .map(|&variant| (variant, self.build_one(season, variant, images)))
            .collect()
    }
}
