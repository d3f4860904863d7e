//! MCP Resources for the Image server.
//!
//! - `nanobanana://models` - Available Gemini image models and their fallback chain

use crate::fallback::RETRYABLE_STATUS_CODES;
use crate::handler::MAX_REFERENCE_IMAGES;
use nanobanana_mcp_common::models::{ImageModel, ModelRegistry};
use serde::Serialize;

/// URI of the models resource.
pub const MODELS_RESOURCE_URI: &str = "nanobanana://models";

/// Information about an available image model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    /// Model identifier
    pub id: &'static str,
    /// Accepted aliases
    pub aliases: Vec<&'static str>,
    /// Marketing name
    pub display_name: &'static str,
    /// Quality tier
    pub tier: &'static str,
    /// Whether the model is used when none is requested
    pub is_default: bool,
    /// Model used when this one is rate limited or forbidden
    pub fallback: Option<&'static str>,
    /// Statuses that trigger the fallback
    pub fallback_statuses: Vec<u16>,
    /// Maximum reference images per request
    pub max_reference_images: usize,
}

/// List all available image models.
pub fn list_models() -> Vec<ModelInfo> {
    let default_id = ImageModel::default().id();
    ModelRegistry::list_image_models()
        .iter()
        .map(|m| ModelInfo {
            id: m.id,
            aliases: m.aliases.to_vec(),
            display_name: m.display_name,
            tier: m.tier,
            is_default: m.id == default_id,
            fallback: m.fallback,
            fallback_statuses: if m.fallback.is_some() {
                RETRYABLE_STATUS_CODES.to_vec()
            } else {
                Vec::new()
            },
            max_reference_images: MAX_REFERENCE_IMAGES,
        })
        .collect()
}

/// Get models resource as JSON string.
pub fn models_resource_json() -> String {
    serde_json::to_string_pretty(&list_models()).unwrap_or_else(|_| "[]".to_string())
}
