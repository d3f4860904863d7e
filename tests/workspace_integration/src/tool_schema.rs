//! Tool schema validity tests.
//!
//! The `generate_image` input schema must be a draft-07 object schema whose
//! properties match the camelCase arguments the server accepts, with enum
//! values inlined so clients can render choices.

use serde_json::Value;

/// Validates that a JSON schema has the required structure.
fn validate_json_schema(schema: &Value) -> Result<(), String> {
    let obj = schema
        .as_object()
        .ok_or_else(|| "Schema must be an object".to_string())?;

    if let Some(type_val) = obj.get("type") {
        if type_val != "object" {
            return Err(format!("Expected type 'object', got {:?}", type_val));
        }
    }

    if let Some(properties) = obj.get("properties") {
        if !properties.is_object() {
            return Err("Properties must be an object".to_string());
        }
    }

    Ok(())
}

/// Validates that a tool has required fields.
fn validate_tool(tool: &rmcp::model::Tool) -> Result<(), String> {
    if tool.name.is_empty() {
        return Err("Tool name cannot be empty".to_string());
    }

    if tool.description.as_ref().is_none_or(|d| d.is_empty()) {
        return Err(format!("Tool '{}' must have a description", tool.name));
    }

    if tool.input_schema.is_empty() {
        return Err(format!("Tool '{}' must have an input schema", tool.name));
    }

    let schema_value = serde_json::to_value(&*tool.input_schema)
        .map_err(|e| format!("Failed to serialize schema: {}", e))?;
    validate_json_schema(&schema_value)?;

    Ok(())
}

/// Collect every string listed under an `enum` keyword anywhere in `schema`.
fn enum_values(schema: &Value) -> Vec<String> {
    let mut values = Vec::new();
    match schema {
        Value::Object(map) => {
            for (key, value) in map {
                if key == "enum" {
                    if let Some(items) = value.as_array() {
                        values.extend(items.iter().filter_map(|v| v.as_str().map(str::to_string)));
                    }
                } else {
                    values.extend(enum_values(value));
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                values.extend(enum_values(item));
            }
        }
        _ => {}
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanobanana_mcp_image::server::{GenerateImageToolParams, generate_image_tool, tool_input_schema};
    use std::borrow::Cow;
    use std::sync::Arc;

    fn generate_image_schema() -> Value {
        serde_json::to_value(&*generate_image_tool().input_schema).unwrap()
    }

    #[test]
    fn test_json_schema_validation() {
        let valid_schema = serde_json::json!({
            "type": "object",
            "properties": {"prompt": {"type": "string"}},
            "required": ["prompt"]
        });
        assert!(validate_json_schema(&valid_schema).is_ok());

        let invalid_schema = serde_json::json!({"type": "string"});
        assert!(validate_json_schema(&invalid_schema).is_err());
    }

    #[test]
    fn test_tool_validation_rejects_empty_fields() {
        let invalid_tool = rmcp::model::Tool {
            name: Cow::Borrowed(""),
            description: Some(Cow::Borrowed("A test tool")),
            input_schema: Arc::new(serde_json::Map::new()),
            annotations: None,
            icons: None,
            meta: None,
            output_schema: None,
            title: None,
        };
        assert!(validate_tool(&invalid_tool).is_err());

        let no_description = rmcp::model::Tool {
            name: Cow::Borrowed("generate_image"),
            description: None,
            input_schema: tool_input_schema::<GenerateImageToolParams>(),
            annotations: None,
            icons: None,
            meta: None,
            output_schema: None,
            title: None,
        };
        assert!(validate_tool(&no_description).is_err());
    }

    #[test]
    fn test_generate_image_tool_is_valid() {
        let tool = generate_image_tool();
        assert!(validate_tool(&tool).is_ok(), "{:?}", validate_tool(&tool));
    }

    #[test]
    fn test_generate_image_schema_properties() {
        let schema = generate_image_schema();
        let properties = schema["properties"].as_object().unwrap();

        for field in ["prompt", "imagePaths", "model", "aspectRatio", "outputFormat", "outputPath"] {
            assert!(properties.contains_key(field), "Schema should have '{}' property", field);
        }
        assert!(!properties.contains_key("image_paths"), "Properties should be camelCase");
        assert_eq!(schema["required"], serde_json::json!(["prompt"]));
    }

    #[test]
    fn test_generate_image_schema_lists_enum_values() {
        let schema = generate_image_schema();

        let models = enum_values(&schema["properties"]["model"]);
        assert!(models.contains(&"gemini-3-pro-image-preview".to_string()));
        assert!(models.contains(&"gemini-2.5-flash-image".to_string()));

        let ratios = enum_values(&schema["properties"]["aspectRatio"]);
        for ratio in ["1:1", "16:9", "9:16", "4:3", "3:4"] {
            assert!(ratios.contains(&ratio.to_string()), "missing ratio {}", ratio);
        }
        assert_eq!(ratios.len(), 5);

        let formats = enum_values(&schema["properties"]["outputFormat"]);
        assert_eq!(formats.len(), 3);
        for format in ["png", "jpeg", "webp"] {
            assert!(formats.contains(&format.to_string()), "missing format {}", format);
        }
    }

    #[test]
    fn test_generate_image_schema_has_no_refs() {
        let text = generate_image_schema().to_string();
        assert!(!text.contains("$ref"), "Subschemas should be inlined: {}", text);
    }
}

#[cfg(test)]
mod property_tests {
    use nanobanana_mcp_image::server::parse_tool_params;
    use proptest::prelude::*;

    fn aspect_ratio_strategy() -> impl Strategy<Value = &'static str> {
        prop_oneof![Just("1:1"), Just("16:9"), Just("9:16"), Just("4:3"), Just("3:4")]
    }

    fn model_strategy() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("gemini-3-pro-image-preview"),
            Just("gemini-2.5-flash-image"),
            Just("pro"),
            Just("flash"),
        ]
    }

    proptest! {
        /// Every argument combination the schema allows is accepted by the server.
        #[test]
        fn schema_values_are_accepted(
            prompt in ".{0,80}",
            ratio in aspect_ratio_strategy(),
            model in model_strategy(),
            format in prop_oneof![Just("png"), Just("jpeg"), Just("webp")],
            paths in proptest::collection::vec("[a-z]{1,8}\\.png", 0..=14),
        ) {
            let args = serde_json::json!({
                "prompt": prompt,
                "imagePaths": paths,
                "model": model,
                "aspectRatio": ratio,
                "outputFormat": format,
            });
            let params = parse_tool_params(args.as_object().cloned());
            prop_assert!(params.is_ok(), "rejected {}: {:?}", args, params.as_ref().err());
            prop_assert!(params.unwrap().validate().is_ok());
        }

        /// Unknown aspect ratios are rejected at parse time.
        #[test]
        fn unknown_aspect_ratio_rejected(ratio in "[0-9]{1,2}:[0-9]{1,2}") {
            prop_assume!(!["1:1", "16:9", "9:16", "4:3", "3:4"].contains(&ratio.as_str()));
            let args = serde_json::json!({"prompt": "x", "aspectRatio": ratio});
            prop_assert!(parse_tool_params(args.as_object().cloned()).is_err());
        }
    }
}
