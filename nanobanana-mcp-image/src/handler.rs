//! Image generation handler for the MCP Image server.
//!
//! This module provides the `ImageHandler` struct, which turns a prompt and a
//! list of reference images into a single Gemini `generateContent` call and
//! normalizes the answer into optional text plus an optional image.

use crate::fallback::FallbackState;
use crate::loader::EncodedImage;
use crate::mime::DEFAULT_MIME_TYPE;
use nanobanana_mcp_common::config::{API_KEY_ENV, Config};
use nanobanana_mcp_common::error::{ConfigError, Error, Result};
use nanobanana_mcp_common::models::ImageModel;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, instrument, warn};

/// Maximum number of reference images accepted per request.
pub const MAX_REFERENCE_IMAGES: usize = 14;

/// Response modalities requested on every call.
pub const RESPONSE_MODALITIES: &[&str] = &["TEXT", "IMAGE"];

/// Aspect ratio requested for the generated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "4:3")]
    Standard,
    #[serde(rename = "3:4")]
    StandardPortrait,
}

impl AspectRatio {
    /// Ratio as written in tool arguments.
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Standard => "4:3",
            AspectRatio::StandardPortrait => "3:4",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested encoding of the generated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl OutputFormat {
    /// Format name as written in tool arguments.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Webp => "webp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generation call.
///
/// `aspect_ratio` and `output_format` are part of the tool surface but are not
/// sent to the API; only the response modalities are.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    /// Prompt text, passed through verbatim (may be empty)
    pub prompt: String,
    /// Reference images, sent in this order after the prompt
    pub images: Vec<EncodedImage>,
    /// Requested model
    pub model: ImageModel,
    /// Requested aspect ratio
    pub aspect_ratio: AspectRatio,
    /// Requested output format
    pub output_format: OutputFormat,
}

impl GenerationRequest {
    /// Text-only request on the default model.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    /// Attach reference images.
    pub fn with_images(mut self, images: Vec<EncodedImage>) -> Self {
        self.images = images;
        self
    }

    /// Select the model.
    pub fn with_model(mut self, model: ImageModel) -> Self {
        self.model = model;
        self
    }
}

/// Normalized outcome of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Last text part of the response
    pub text: Option<String>,
    /// Last image part of the response
    pub image: Option<EncodedImage>,
    /// Model that produced the response
    pub model_used: ImageModel,
    /// Model the caller asked for
    pub requested_model: ImageModel,
    /// True when `model_used` was substituted after a retryable failure
    pub fallback: bool,
}

/// Image generation handler.
///
/// Holds read-only configuration and a shared HTTP client; safe to use from
/// concurrent tool calls.
pub struct ImageHandler {
    /// Application configuration.
    pub config: Config,
    /// HTTP client for API requests.
    pub http: reqwest::Client,
}

impl ImageHandler {
    /// Create a new ImageHandler with the given configuration.
    pub fn new(config: Config) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Create a new ImageHandler with a provided HTTP client.
    pub fn with_client(config: Config, http: reqwest::Client) -> Self {
        debug!(config = ?config, "Initializing ImageHandler");
        Self { config, http }
    }

    /// Generate content for a prompt and optional reference images.
    ///
    /// # Errors
    /// - `Error::Config` if no API key is configured (no request is sent)
    /// - `Error::Api` for non-success statuses not covered by fallback
    /// - `Error::Payload` if a success response carries an error object or bad JSON
    /// - `Error::NoContent` if the response holds neither text nor image
    #[instrument(
        level = "info",
        name = "generate_image",
        skip(self, request),
        fields(
            model = %request.model,
            images = request.images.len(),
            aspect_ratio = %request.aspect_ratio,
            output_format = %request.output_format,
        )
    )]
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResult> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ConfigError::missing_env_var(API_KEY_ENV))?;

        let body = build_request(&request.prompt, &request.images);
        let mut state = FallbackState::new(request.model);

        let response_text = loop {
            let endpoint = self.config.endpoint(state.model().id());
            debug!(endpoint = %endpoint, parts = body.part_count(), "Calling Gemini generateContent");

            let response = self
                .http
                .post(&endpoint)
                .header("x-goog-api-key", api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| Error::api(&endpoint, 0, format!("Request failed: {}", e)))?;

            let status = response.status();
            if status.is_success() {
                break response.text().await.map_err(|e| {
                    Error::api(&endpoint, status.as_u16(), format!("Failed to read response: {}", e))
                })?;
            }

            let error_body = response.text().await.unwrap_or_default();
            match state.on_failure(status.as_u16()) {
                Some(next) => {
                    warn!(
                        status = status.as_u16(),
                        from = %state.model(),
                        to = %next.model(),
                        "Model unavailable, retrying with fallback model"
                    );
                    state = next;
                }
                None => return Err(Error::api(&endpoint, status.as_u16(), error_body)),
            }
        };

        let content = parse_response(&response_text)?;

        info!(
            model_used = %state.model(),
            fallback = state.is_fallback(),
            has_text = content.text.is_some(),
            has_image = content.image.is_some(),
            "Generation complete"
        );

        Ok(GenerationResult {
            text: content.text,
            image: content.image,
            model_used: state.model(),
            requested_model: state.requested(),
            fallback: state.is_fallback(),
        })
    }
}

/// Build the `generateContent` body: the prompt first, then each image in order.
pub fn build_request(prompt: &str, images: &[EncodedImage]) -> GenerateContentRequest {
    let parts = std::iter::once(RequestPart::Text {
        text: prompt.to_string(),
    })
    .chain(images.iter().map(|image| RequestPart::InlineData {
        inline_data: InlineData {
            mime_type: image.effective_mime_type().to_string(),
            data: image.data.clone(),
        },
    }))
    .collect();

    GenerateContentRequest {
        contents: vec![RequestContent { parts }],
        generation_config: GenerationConfig {
            response_modalities: RESPONSE_MODALITIES.iter().map(|m| m.to_string()).collect(),
        },
    }
}

/// Text and image extracted from a response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedContent {
    /// Last text part
    pub text: Option<String>,
    /// Last image part
    pub image: Option<EncodedImage>,
}

/// A response part the server understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedPart {
    Text(String),
    Image(EncodedImage),
}

impl GeneratedPart {
    fn from_response(part: ResponsePart) -> Option<Self> {
        match part {
            ResponsePart::InlineData { inline_data } => {
                let mime_type = if inline_data.mime_type.trim().is_empty() {
                    DEFAULT_MIME_TYPE.to_string()
                } else {
                    inline_data.mime_type
                };
                Some(GeneratedPart::Image(EncodedImage {
                    data: inline_data.data,
                    mime_type,
                }))
            }
            ResponsePart::Text { text } => Some(GeneratedPart::Text(text)),
            ResponsePart::Other(_) => None,
        }
    }
}

/// Fold parts so the last text and the last image win.
pub fn fold_parts(parts: impl IntoIterator<Item = GeneratedPart>) -> NormalizedContent {
    parts
        .into_iter()
        .fold(NormalizedContent::default(), |acc, part| match part {
            GeneratedPart::Text(text) => NormalizedContent {
                text: Some(text),
                ..acc
            },
            GeneratedPart::Image(image) => NormalizedContent {
                image: Some(image),
                ..acc
            },
        })
}

/// Parse a success-status response body.
///
/// # Errors
/// - `Error::Payload` for invalid JSON or an `error` object in the body
/// - `Error::NoContent` if the first candidate has no usable parts
pub fn parse_response(body: &str) -> Result<NormalizedContent> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| Error::payload(format!("Failed to parse response: {}", e)))?;

    if let Some(error) = response.error {
        return Err(Error::payload(error.describe()));
    }

    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .filter(|parts| !parts.is_empty())
        .ok_or(Error::NoContent)?;

    let content = fold_parts(parts.into_iter().filter_map(GeneratedPart::from_response));
    if content.text.is_none() && content.image.is_none() {
        return Err(Error::NoContent);
    }
    Ok(content)
}

// =============================================================================
// Gemini API Request/Response Types
// =============================================================================

/// Gemini `generateContent` request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation turns (always exactly one)
    pub contents: Vec<RequestContent>,
    /// Generation settings
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// Number of parts across all turns.
    pub fn part_count(&self) -> usize {
        self.contents.iter().map(|c| c.parts.len()).sum()
    }
}

/// A single request turn.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContent {
    pub parts: Vec<RequestPart>,
}

/// Request part: prompt text or inline image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

/// Generation settings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

/// Inline binary payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// MIME type (may be missing in responses)
    #[serde(default, alias = "mime_type")]
    pub mime_type: String,
    /// Base64-encoded bytes
    pub data: String,
}

/// Gemini `generateContent` response.
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

/// Response candidate.
#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
}

/// Candidate content.
#[derive(Debug, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Option<Vec<ResponsePart>>,
}

/// Response part. Unknown shapes are kept as `Other` and ignored.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ResponsePart {
    InlineData {
        #[serde(rename = "inlineData", alias = "inline_data")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
    Other(serde_json::Value),
}

/// Error object embedded in a response body.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ApiErrorBody {
    fn describe(&self) -> String {
        match (&self.message, &self.status) {
            (Some(message), _) => message.clone(),
            (None, Some(status)) => status.clone(),
            (None, None) => match self.code {
                Some(code) => format!("error code {}", code),
                None => "unknown error".to_string(),
            },
        }
    }
}
