//! Response handling module - output parsing, base64 and file storage

pub mod base64;
pub mod file;
pub mod parser;

use std::path::PathBuf;

use crate::backend::traits::GenerationResponse;
use crate::error::Result;

pub use file::ArtifactStore;
pub use parser::{extract, ExtractedOutput};

/// Text and saved image paths for one generation call
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProcessedOutput {
    pub texts: Vec<String>,
    pub images: Vec<PathBuf>,
}

/// Response handler for processing generation output
pub struct ResponseHandler {
    store: ArtifactStore,
}

impl ResponseHandler {
    /// Create a new response handler
    pub fn new(store: ArtifactStore) -> Self {
        Self { store }
    }

    /// Extract text and persist every generated image under `label`.
    ///
    /// The first image is saved as `label`, later ones as `label_2`, `label_3`...
    pub async fn process(&self, response: &GenerationResponse, label: &str) -> Result<ProcessedOutput> {
        let extracted = extract(&response.output)?;

        let mut images = Vec::with_capacity(extracted.images.len());
        for (i, data) in extracted.images.iter().enumerate() {
            let name = if i == 0 {
                label.to_string()
            } else {
                format!("{}_{}", label, i + 1)
            };
            images.push(self.store.save(data, &name).await?);
        }

        Ok(ProcessedOutput {
            texts: extracted.texts,
            images,
        })
    }

    /// Extract text and persist images under timestamped names
    pub async fn process_timestamped(
        &self,
        response: &GenerationResponse,
        prefix: &str,
    ) -> Result<ProcessedOutput> {
        let extracted = extract(&response.output)?;

        let mut images = Vec::with_capacity(extracted.images.len());
        for data in &extracted.images {
            images.push(self.store.save_timestamped(data, prefix).await?);
        }

        Ok(ProcessedOutput {
            texts: extracted.texts,
            images,
        })
    }
}
