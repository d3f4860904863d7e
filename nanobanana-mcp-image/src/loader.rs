//! Reading reference images from disk and writing generated images back.

use crate::mime::{DEFAULT_MIME_TYPE, mime_type_for_path};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use nanobanana_mcp_common::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Base64-encoded image bound to its MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedImage {
    /// Base64-encoded image bytes (standard alphabet, padded)
    pub data: String,
    /// MIME type of the image
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
}

fn default_mime_type() -> String {
    DEFAULT_MIME_TYPE.to_string()
}

impl EncodedImage {
    /// Encode raw bytes.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            data: BASE64.encode(bytes),
            mime_type: mime_type.into(),
        }
    }

    /// MIME type to send upstream; blank values fall back to `image/png`.
    pub fn effective_mime_type(&self) -> &str {
        if self.mime_type.trim().is_empty() {
            DEFAULT_MIME_TYPE
        } else {
            &self.mime_type
        }
    }

    /// Decode the base64 payload back to bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(self.data.trim())
            .map_err(|e| Error::payload(format!("Invalid base64 image data: {}", e)))
    }
}

/// Read an image file and encode it.
///
/// # Errors
/// Returns `Error::ImageRead` naming the path if the file is missing or unreadable.
#[instrument(level = "debug", skip_all, fields(path = %path))]
pub async fn load_image(path: &str) -> Result<EncodedImage> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::image_read(path, e))?;
    let mime_type = mime_type_for_path(path);
    debug!(bytes = bytes.len(), mime_type, "Loaded reference image");
    Ok(EncodedImage::from_bytes(&bytes, mime_type))
}

/// Load several images in order, stopping at the first failure.
pub async fn load_images(paths: &[String]) -> Result<Vec<EncodedImage>> {
    let mut images = Vec::with_capacity(paths.len());
    for path in paths {
        images.push(load_image(path).await?);
    }
    Ok(images)
}

/// Decode an image and write it to `path`, creating parent directories.
///
/// # Errors
/// Returns `Error::Payload` for undecodable data and `Error::OutputWrite` for
/// filesystem failures.
#[instrument(level = "debug", skip_all, fields(path = %path))]
pub async fn write_image(image: &EncodedImage, path: &str) -> Result<()> {
    let bytes = image.decode()?;

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::output_write(path, e))?;
        }
    }

    tokio::fs::write(path, &bytes)
        .await
        .map_err(|e| Error::output_write(path, e))?;

    info!(path = %path, bytes = bytes.len(), "Saved image to local file");
    Ok(())
}
