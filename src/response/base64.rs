//! Base64 encoding and decoding utilities

use base64::{engine::general_purpose::STANDARD, Engine};
use crate::error::{AppError, Result};

/// Encode binary data to base64 string
pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode base64 string to binary data
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    // Handle data URL format (e.g., "data:image/png;base64,...")
    let data = match encoded.split_once(',') {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => encoded,
    };

    STANDARD
        .decode(data.trim())
        .map_err(|e| AppError::InvalidImageData(format!("Invalid base64 data: {}", e)))
}

/// Wrap already-encoded image data in a data URL
pub fn data_url(media_type: &str, encoded: &str) -> String {
    format!("data:{};base64,{}", media_type, encoded)
}
