//! Model definitions and registry for Gemini image models.
//!
//! Two tiers exist: the high-quality "pro" model and the fast "flash" model.
//! The pro model degrades to flash when it is rate limited or not available
//! to the caller's key; flash has nothing below it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gemini image generation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
pub enum ImageModel {
    // Nano Banana Pro
    #[default]
    #[serde(rename = "gemini-3-pro-image-preview", alias = "pro", alias = "nano-banana-pro")]
    Pro,
    // Nano Banana
    #[serde(rename = "gemini-2.5-flash-image", alias = "flash", alias = "nano-banana")]
    Flash,
}

/// Static description of an image model.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ImageModelInfo {
    /// Full model identifier
    pub id: &'static str,
    /// Model aliases for convenience
    pub aliases: &'static [&'static str],
    /// Marketing name
    pub display_name: &'static str,
    /// Quality tier ("pro" or "flash")
    pub tier: &'static str,
    /// Model substituted when this one is rate limited or forbidden
    pub fallback: Option<&'static str>,
}

// =============================================================================
// Static Model Definitions
// =============================================================================

/// Gemini 3 Pro Image (preview)
pub const GEMINI_3_PRO_IMAGE: ImageModelInfo = ImageModelInfo {
    id: "gemini-3-pro-image-preview",
    aliases: &["pro", "nano-banana-pro"],
    display_name: "Nano Banana Pro",
    tier: "pro",
    fallback: Some("gemini-2.5-flash-image"),
};

/// Gemini 2.5 Flash Image
pub const GEMINI_2_5_FLASH_IMAGE: ImageModelInfo = ImageModelInfo {
    id: "gemini-2.5-flash-image",
    aliases: &["flash", "nano-banana"],
    display_name: "Nano Banana",
    tier: "flash",
    fallback: None,
};

/// All available image models
pub const IMAGE_MODELS: &[ImageModelInfo] = &[GEMINI_3_PRO_IMAGE, GEMINI_2_5_FLASH_IMAGE];

impl ImageModel {
    /// Static definition for this model.
    pub fn info(self) -> &'static ImageModelInfo {
        match self {
            ImageModel::Pro => &GEMINI_3_PRO_IMAGE,
            ImageModel::Flash => &GEMINI_2_5_FLASH_IMAGE,
        }
    }

    /// Canonical model identifier used in API paths.
    pub fn id(self) -> &'static str {
        self.info().id
    }

    /// Whether this is the high-quality tier.
    pub fn is_pro(self) -> bool {
        matches!(self, ImageModel::Pro)
    }

    /// The model to retry with when this one is unavailable.
    pub fn fallback(self) -> Option<ImageModel> {
        match self {
            ImageModel::Pro => Some(ImageModel::Flash),
            ImageModel::Flash => None,
        }
    }
}

impl fmt::Display for ImageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Model registry listing the available image models.
pub struct ModelRegistry;

impl ModelRegistry {
    /// List all image models.
    pub fn list_image_models() -> &'static [ImageModelInfo] {
        IMAGE_MODELS
    }
}
