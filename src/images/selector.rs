//! Resolves requested indices into images from the raw images directory

use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::error::Result;

const IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "png"];

/// A source image on disk, identified by its path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResource {
    path: PathBuf,
    stem: String,
}

impl ImageResource {
    /// Build a resource from a path; returns `None` when the path has no file stem
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let stem = path.file_stem()?.to_string_lossy().into_owned();
        Some(Self { path, stem })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without extension, used as the cache key
    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// MIME type derived from the file extension
    pub fn media_type(&self) -> &'static str {
        match extension_of(&self.path).as_deref() {
            Some("png") => "image/png",
            _ => "image/jpeg",
        }
    }

    /// Read the raw bytes of the image
    pub async fn read_bytes(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.path).await?)
    }
}

/// Selects images from a directory by position
pub struct ImageSelector {
    dir: PathBuf,
}

impl ImageSelector {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// All `.jpg` and `.png` files in the directory, sorted by file name
    pub async fn list(&self) -> Result<Vec<ImageResource>> {
        let mut images = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_image = extension_of(&path)
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
                .unwrap_or(false);
            if !is_image || !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(image) = ImageResource::from_path(path) {
                images.push(image);
            }
        }

        images.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(images)
    }

    /// Images at the requested indices, in requested order.
    ///
    /// Indices past the end of the listing are skipped without error, so the
    /// result may be shorter than `indices`.
    pub async fn select(&self, indices: &[usize]) -> Result<Vec<ImageResource>> {
        let available = self.list().await?;
        let selected: Vec<ImageResource> = indices
            .iter()
            .filter_map(|&i| available.get(i).cloned())
            .collect();

        if selected.len() < indices.len() {
            debug!(
                dir = ?self.dir,
                requested = indices.len(),
                available = available.len(),
                selected = selected.len(),
                "Dropped out-of-range image indices"
            );
        }

        Ok(selected)
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}
