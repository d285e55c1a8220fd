//! File storage for generated images

use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::config::ArtifactNaming;
use crate::error::Result;

/// Writes generated images into the output directory
pub struct ArtifactStore {
    storage_path: PathBuf,
    naming: ArtifactNaming,
}

impl ArtifactStore {
    /// Create a new artifact store
    pub fn new(storage_path: impl Into<PathBuf>, naming: ArtifactNaming) -> Self {
        Self {
            storage_path: storage_path.into(),
            naming,
        }
    }

    /// Ensure the storage directory exists
    pub async fn ensure_storage_dir(&self) -> Result<()> {
        if !self.storage_path.exists() {
            fs::create_dir_all(&self.storage_path).await?;
            debug!(path = ?self.storage_path, "Created storage directory");
        }
        Ok(())
    }

    /// Save the image generated for a style variant.
    ///
    /// With [`ArtifactNaming::Overwrite`] the file is `<variant>.<ext>` and a
    /// later run for the same variant replaces it.
    pub async fn save(&self, data: &[u8], variant: &str) -> Result<PathBuf> {
        let format = detect_image_format(data).unwrap_or("png");
        let filename = match self.naming {
            ArtifactNaming::Overwrite => format!("{}.{}", variant, format),
            ArtifactNaming::Unique => unique_name(variant, format),
        };
        self.write(&filename, data).await
    }

    /// Save an image under a timestamped name derived from `prefix`
    pub async fn save_timestamped(&self, data: &[u8], prefix: &str) -> Result<PathBuf> {
        let format = detect_image_format(data).unwrap_or("png");
        self.write(&unique_name(prefix, format), data).await
    }

    async fn write(&self, filename: &str, data: &[u8]) -> Result<PathBuf> {
        self.ensure_storage_dir().await?;

        let file_path = self.storage_path.join(filename);
        write_atomic(&file_path, data).await?;

        debug!(path = ?file_path, size = data.len(), "Saved image file");

        Ok(file_path)
    }
}

fn unique_name(prefix: &str, format: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}_{}.{}",
        prefix,
        Utc::now().format("%Y%m%d_%H%M%S"),
        &id[..8],
        format
    )
}

/// Write `data` to a sibling temp file and rename it over `path`
pub(crate) async fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));

    fs::write(&tmp_path, data).await?;
    if let Err(e) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(e.into());
    }
    Ok(())
}

/// Detect image format from binary data using magic bytes
fn detect_image_format(data: &[u8]) -> Option<&'static str> {
    if data.len() < 8 {
        return None;
    }

    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("png");
    }

    // JPEG: FF D8 FF
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("jpg");
    }

    // WebP: RIFF....WEBP
    if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
        return Some("webp");
    }

    None
}
