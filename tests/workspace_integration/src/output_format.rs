//! Output format tests.
//!
//! A `generate_image` result is either a success holding a status text block
//! plus one inline image or save confirmation, or an error-flagged result with
//! a single `Error: ` text block.

use rmcp::model::{CallToolResult, Content, RawContent};

/// Validates that a CallToolResult has valid content format.
fn validate_tool_result(result: &CallToolResult) -> Result<(), String> {
    if result.content.is_empty() {
        return Err("Result should have content".to_string());
    }

    for content in &result.content {
        validate_content(content)?;
    }

    if result.is_error == Some(true) {
        return validate_error_result(result);
    }

    match &result.content[0].raw {
        RawContent::Text(_) => Ok(()),
        _ => Err("Successful result should start with a status text block".to_string()),
    }
}

/// Error results carry exactly one text block prefixed with `Error: `.
fn validate_error_result(result: &CallToolResult) -> Result<(), String> {
    if result.content.len() != 1 {
        return Err(format!("Error result should have one block, got {}", result.content.len()));
    }
    match &result.content[0].raw {
        RawContent::Text(text) if text.text.starts_with("Error: ") => Ok(()),
        RawContent::Text(text) => Err(format!("Error text should start with 'Error: ', got {:?}", text.text)),
        _ => Err("Error result should be text".to_string()),
    }
}

/// Validates that a Content item has valid structure.
fn validate_content(content: &Content) -> Result<(), String> {
    match &content.raw {
        RawContent::Text(text_content) => {
            if text_content.text.is_empty() {
                return Err("Text content should not be empty".to_string());
            }
            Ok(())
        }
        RawContent::Image(image_content) => {
            if image_content.data.is_empty() {
                return Err("Image content should have data".to_string());
            }
            if !image_content.mime_type.starts_with("image/") {
                return Err(format!(
                    "Image content should have image/* mime type, got: {}",
                    image_content.mime_type
                ));
            }
            Ok(())
        }
        _ => Err("generate_image only returns text and image content".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanobanana_mcp_common::Config;
    use nanobanana_mcp_image::ImageServer;
    use nanobanana_mcp_image::server::GenerateImageToolParams;

    #[test]
    fn test_content_helpers() {
        assert!(validate_content(&Content::text("Generated with gemini-2.5-flash-image")).is_ok());
        assert!(validate_content(&Content::text("")).is_err());
        assert!(validate_content(&Content::image("iVBORw0KGgo=", "image/png")).is_ok());
        assert!(validate_content(&Content::image("", "image/png")).is_err());
        assert!(validate_content(&Content::image("iVBORw0KGgo=", "text/plain")).is_err());
    }

    #[test]
    fn test_success_result_shapes() {
        let inline = CallToolResult::success(vec![
            Content::text("Generated with gemini-3-pro-image-preview"),
            Content::image("iVBORw0KGgo=", "image/png"),
        ]);
        assert!(validate_tool_result(&inline).is_ok());

        let saved = CallToolResult::success(vec![
            Content::text("Generated with gemini-3-pro-image-preview"),
            Content::text("Image saved to: /tmp/out.png"),
        ]);
        assert!(validate_tool_result(&saved).is_ok());

        let image_first = CallToolResult::success(vec![Content::image("iVBORw0KGgo=", "image/png")]);
        assert!(validate_tool_result(&image_first).is_err());
    }

    #[test]
    fn test_error_result_shape() {
        let ok = CallToolResult::error(vec![Content::text("Error: boom")]);
        assert!(validate_tool_result(&ok).is_ok());

        let unprefixed = CallToolResult::error(vec![Content::text("boom")]);
        assert!(validate_tool_result(&unprefixed).is_err());

        let empty = CallToolResult {
            content: vec![],
            is_error: Some(true),
            meta: None,
            structured_content: None,
        };
        assert!(validate_tool_result(&empty).is_err());
    }

    #[tokio::test]
    async fn test_missing_key_result_is_well_formed() {
        let server = ImageServer::new(Config::new(None));
        let result = server
            .generate_image(GenerateImageToolParams {
                prompt: "A sunset over mountains".to_string(),
                ..Default::default()
            })
            .await;

        assert_eq!(result.is_error, Some(true));
        assert!(validate_tool_result(&result).is_ok(), "{:?}", validate_tool_result(&result));
    }

    #[tokio::test]
    async fn test_unreadable_image_result_is_well_formed() {
        let server = ImageServer::new(Config::new(Some("key".to_string())));
        let result = server
            .generate_image(GenerateImageToolParams {
                prompt: "Edit".to_string(),
                image_paths: Some(vec!["/nonexistent/dir/ref.png".to_string()]),
                ..Default::default()
            })
            .await;

        assert_eq!(result.is_error, Some(true));
        assert!(validate_tool_result(&result).is_ok());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn valid_text_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 .,!?]{1,100}"
    }

    fn valid_base64_data_strategy() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9+/]{4,100}"
    }

    fn valid_image_mime_strategy() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("image/png"),
            Just("image/jpeg"),
            Just("image/gif"),
            Just("image/webp"),
        ]
    }

    proptest! {
        /// A status block followed by an inline image is always well-formed.
        #[test]
        fn status_plus_image_passes(
            status in valid_text_strategy(),
            data in valid_base64_data_strategy(),
            mime in valid_image_mime_strategy(),
        ) {
            let result = CallToolResult::success(vec![Content::text(&status), Content::image(&data, mime)]);
            let validation = validate_tool_result(&result);
            prop_assert!(validation.is_ok(), "should pass: {:?}", validation.err());
            prop_assert!(!result.is_error.unwrap_or(true));
        }

        /// Any message wrapped with the error prefix is a valid error result.
        #[test]
        fn prefixed_error_passes(message in valid_text_strategy()) {
            let result = CallToolResult::error(vec![Content::text(format!("Error: {}", message))]);
            prop_assert!(validate_tool_result(&result).is_ok());
        }
    }
}
