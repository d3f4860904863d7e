//! MCP Server implementation for the Image server.
//!
//! This module provides the MCP server handler that exposes:
//! - `generate_image` tool for text-to-image generation and image editing
//! - `nanobanana://models` resource describing the available models

use crate::handler::{
    AspectRatio, GenerationRequest, GenerationResult, ImageHandler, MAX_REFERENCE_IMAGES, OutputFormat,
};
use crate::loader::{load_images, write_image};
use crate::resources::{self, MODELS_RESOURCE_URI};
use nanobanana_mcp_common::config::Config;
use nanobanana_mcp_common::error::{Error, Result};
use nanobanana_mcp_common::models::ImageModel;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::{
        CallToolResult, Content, JsonObject, ListResourcesResult, ReadResourceResult, ResourceContents,
        ServerCapabilities, ServerInfo, Tool,
    },
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name of the single tool exposed by this server.
pub const GENERATE_IMAGE_TOOL: &str = "generate_image";

/// MCP Server for image generation.
#[derive(Clone)]
pub struct ImageServer {
    /// Handler for image generation operations
    handler: Arc<ImageHandler>,
}

/// Tool parameters for generate_image.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageToolParams {
    /// Text prompt describing the image to generate or the edit to apply
    pub prompt: String,
    /// Paths of reference images to send with the prompt, in order (at most 14)
    #[serde(default)]
    #[schemars(length(max = 14))]
    pub image_paths: Option<Vec<String>>,
    /// Model to use (default: gemini-3-pro-image-preview, falls back to
    /// gemini-2.5-flash-image when rate limited)
    #[serde(default)]
    pub model: Option<ImageModel>,
    /// Aspect ratio of the generated image (default: 1:1)
    #[serde(default)]
    pub aspect_ratio: Option<AspectRatio>,
    /// Image format (default: png)
    #[serde(default)]
    pub output_format: Option<OutputFormat>,
    /// Output file path for saving locally instead of returning inline data
    #[serde(default)]
    pub output_path: Option<String>,
}

impl GenerateImageToolParams {
    /// Check limits serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let count = self.image_paths.as_ref().map_or(0, Vec::len);
        if count > MAX_REFERENCE_IMAGES {
            return Err(Error::validation(format!(
                "imagePaths: at most {} reference images are supported, got {}",
                MAX_REFERENCE_IMAGES, count
            )));
        }
        Ok(())
    }

    fn image_paths(&self) -> &[String] {
        self.image_paths.as_deref().unwrap_or(&[])
    }
}

/// Parse raw tool arguments into [`GenerateImageToolParams`].
pub fn parse_tool_params(arguments: Option<JsonObject>) -> std::result::Result<GenerateImageToolParams, McpError> {
    arguments
        .map(|args| serde_json::from_value(serde_json::Value::Object(args)))
        .transpose()
        .map_err(|e| McpError::invalid_params(format!("Invalid parameters: {}", e), None))?
        .ok_or_else(|| McpError::invalid_params("Missing parameters", None))
}

/// JSON schema for a tool parameter type, with subschemas inlined.
pub fn tool_input_schema<T: JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::r#gen::SchemaSettings::draft07()
        .with(|settings| settings.inline_subschemas = true)
        .into_generator()
        .into_root_schema_for::<T>();
    match serde_json::to_value(&schema).unwrap_or_default() {
        serde_json::Value::Object(map) => Arc::new(map),
        _ => Arc::new(JsonObject::new()),
    }
}

/// The `generate_image` tool definition.
pub fn generate_image_tool() -> Tool {
    Tool {
        name: Cow::Borrowed(GENERATE_IMAGE_TOOL),
        description: Some(Cow::Borrowed(
            "Generate or edit an image with Gemini (Nano Banana). \
             Pass reference images via imagePaths to edit or compose them. \
             Returns the image inline, or saves it to outputPath. \
             The pro model falls back to flash when quota or access is exhausted.",
        )),
        input_schema: tool_input_schema::<GenerateImageToolParams>(),
        annotations: None,
        icons: None,
        meta: None,
        output_schema: None,
        title: None,
    }
}

/// Status line for a finished generation, followed by any model text.
pub fn status_text(result: &GenerationResult) -> String {
    let mut status = format!("Generated with {}", result.model_used);
    if result.fallback {
        status.push_str(&format!(
            "\nNote: {} was unavailable (rate limit, quota, access or billing), fell back to {}",
            result.requested_model, result.model_used
        ));
    }
    if let Some(text) = &result.text {
        status.push_str("\n\n");
        status.push_str(text);
    }
    status
}

impl ImageServer {
    /// Create a new ImageServer with the given configuration.
    pub fn new(config: Config) -> Self {
        Self::with_handler(ImageHandler::new(config))
    }

    /// Create a server around an existing handler.
    pub fn with_handler(handler: ImageHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Run `generate_image`. Failures are reported as an error-flagged result.
    pub async fn generate_image(&self, params: GenerateImageToolParams) -> CallToolResult {
        info!(
            prompt_len = params.prompt.len(),
            images = params.image_paths().len(),
            model = ?params.model,
            "Generating image"
        );

        match self.run_generate(params).await {
            Ok(content) => CallToolResult::success(content),
            Err(e) => {
                warn!(error = %e, "generate_image failed");
                CallToolResult::error(vec![Content::text(format!("Error: {}", e))])
            }
        }
    }

    async fn run_generate(&self, params: GenerateImageToolParams) -> Result<Vec<Content>> {
        params.validate()?;

        let images = load_images(params.image_paths()).await?;
        let request = GenerationRequest {
            prompt: params.prompt,
            images,
            model: params.model.unwrap_or_default(),
            aspect_ratio: params.aspect_ratio.unwrap_or_default(),
            output_format: params.output_format.unwrap_or_default(),
        };

        let result = self.handler.generate(request).await?;

        let mut content = vec![Content::text(status_text(&result))];
        if let Some(image) = result.image {
            match params.output_path {
                Some(path) => {
                    write_image(&image, &path).await?;
                    content.push(Content::text(format!("Image saved to: {}", path)));
                }
                None => content.push(Content::image(image.data, image.mime_type)),
            }
        }
        Ok(content)
    }
}

impl ServerHandler for ImageServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Image generation server using Google's Gemini image models (Nano Banana). \
                 Use generate_image to create images from a text prompt, optionally with \
                 reference images to edit or combine. Read nanobanana://models for the \
                 available models."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<rmcp::model::ListToolsResult, McpError>> + Send + '_
    {
        async move {
            Ok(rmcp::model::ListToolsResult {
                tools: vec![generate_image_tool()],
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        params: rmcp::model::CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            match params.name.as_ref() {
                GENERATE_IMAGE_TOOL => {
                    let tool_params = parse_tool_params(params.arguments)?;
                    Ok(self.generate_image(tool_params).await)
                }
                _ => Err(McpError::invalid_params(format!("Unknown tool: {}", params.name), None)),
            }
        }
    }

    fn list_resources(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<ListResourcesResult, McpError>> + Send + '_ {
        async move {
            debug!("Listing resources");

            let models_resource = rmcp::model::Resource {
                raw: rmcp::model::RawResource {
                    uri: MODELS_RESOURCE_URI.to_string(),
                    name: "Available Image Models".to_string(),
                    title: None,
                    description: Some("Gemini image models, aliases and fallback chain".to_string()),
                    mime_type: Some("application/json".to_string()),
                    size: None,
                    icons: None,
                    meta: None,
                },
                annotations: None,
            };

            Ok(ListResourcesResult {
                resources: vec![models_resource],
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn read_resource(
        &self,
        params: rmcp::model::ReadResourceRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = std::result::Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            let uri = &params.uri;
            debug!(uri = %uri, "Reading resource");

            let content = match uri.as_str() {
                MODELS_RESOURCE_URI => resources::models_resource_json(),
                _ => {
                    return Err(McpError::resource_not_found(
                        format!("Unknown resource: {}", uri),
                        None,
                    ));
                }
            };

            Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(content, uri.clone())],
            })
        }
    }
}
