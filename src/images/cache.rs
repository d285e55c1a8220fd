//! On-disk cache of base64-encoded source images

use dashmap::DashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::images::selector::ImageResource;
use crate::response::{base64, file::write_atomic};

/// Base64 cache keyed by image stem, one `<stem>.txt` file per image.
///
/// Entries are never invalidated: a changed image keeps its old encoding
/// until the cache file is removed by hand.
pub struct Base64Cache {
    cache_dir: PathBuf,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl Base64Cache {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            locks: DashMap::new(),
        }
    }

    /// Path of the cache file for an image
    pub fn entry_path(&self, image: &ImageResource) -> PathBuf {
        self.cache_dir.join(format!("{}.txt", image.stem()))
    }

    /// Base64 text of the image, encoding and storing it on a miss
    pub async fn encode(&self, image: &ImageResource) -> Result<String> {
        let lock = self
            .locks
            .entry(image.stem().to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        let path = self.entry_path(image);
        match fs::read_to_string(&path).await {
            Ok(encoded) => {
                debug!(stem = %image.stem(), "Base64 cache hit");
                return Ok(encoded);
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(AppError::Io(e)),
        }

        let bytes = image.read_bytes().await?;
        let encoded = base64::encode(&bytes);

        fs::create_dir_all(&self.cache_dir).await?;
        write_atomic(&path, encoded.as_bytes()).await?;

        debug!(
            stem = %image.stem(),
            path = ?path,
            size = bytes.len(),
            "Base64 cache miss, stored new entry"
        );

        Ok(encoded)
    }
}
