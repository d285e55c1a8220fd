//! Splits generation output into text and decoded image bytes

use crate::backend::traits::{MessageContent, OutputBlock};
use crate::error::Result;
use crate::response::base64;

/// Text and images extracted from one response, in response order
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExtractedOutput {
    pub texts: Vec<String>,
    pub images: Vec<Vec<u8>>,
}

/// Classify output blocks by kind.
///
/// Unknown block kinds, non-text message items and image calls without a
/// result are skipped. Fails only when an image result is not valid base64.
pub fn extract(output: &[OutputBlock]) -> Result<ExtractedOutput> {
    let mut extracted = ExtractedOutput::default();

    for block in output {
        match block {
            OutputBlock::Message { content } => {
                extracted.texts.extend(content.iter().filter_map(|item| match item {
                    MessageContent::OutputText { text } => Some(text.clone()),
                    MessageContent::Other => None,
                }));
            }
            OutputBlock::ImageGenerationCall { result: Some(b64) } => {
                extracted.images.push(base64::decode(b64)?);
            }
            OutputBlock::ImageGenerationCall { result: None } | OutputBlock::Unknown => {}
        }
    }

    Ok(extracted)
}
