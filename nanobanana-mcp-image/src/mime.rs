//! File extension to MIME type resolution for reference images.

use std::path::Path;

/// MIME type assumed when the extension is unknown or missing.
pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// Supported extensions (lower case) and their MIME types.
pub const MIME_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
];

/// Resolve the MIME type of an image from its path's extension.
///
/// Matching is case-insensitive; anything not in [`MIME_TYPES`] maps to
/// [`DEFAULT_MIME_TYPE`].
pub fn mime_type_for_path(path: impl AsRef<Path>) -> &'static str {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .and_then(|ext| {
            MIME_TYPES
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, mime)| *mime)
        })
        .unwrap_or(DEFAULT_MIME_TYPE)
}
