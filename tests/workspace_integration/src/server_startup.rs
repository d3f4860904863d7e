//! Server startup integration tests.
//!
//! Checks that the image server can be built from configuration alone, with or
//! without an API key, and advertises its tool and resources.

use nanobanana_mcp_common::Config;

/// Configuration pointing at an unreachable API, with an optional key.
fn test_config(api_key: Option<&str>) -> Config {
    Config::new(api_key.map(str::to_string)).with_base_url("http://127.0.0.1:9/v1beta/models/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use nanobanana_mcp_common::{McpServerBuilder, Transport, shutdown_channel};
    use nanobanana_mcp_image::ImageServer;
    use nanobanana_mcp_image::server::{GENERATE_IMAGE_TOOL, generate_image_tool};
    use rmcp::ServerHandler;
    use std::time::Duration;

    #[test]
    fn test_image_server_startup() {
        let server = ImageServer::new(test_config(Some("key")));
        let info = server.get_info();

        let instructions = info.instructions.as_ref().unwrap().to_lowercase();
        assert!(instructions.contains("generate_image"));
        assert!(instructions.contains("nanobanana://models"));
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_some());
    }

    #[test]
    fn test_server_starts_without_api_key() {
        let server = ImageServer::new(test_config(None));
        assert!(server.get_info().instructions.is_some());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = test_config(None);
        assert_eq!(
            config.endpoint("gemini-2.5-flash-image"),
            "http://127.0.0.1:9/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
    }

    #[test]
    fn test_single_tool_registered() {
        let tool = generate_image_tool();
        assert_eq!(tool.name, GENERATE_IMAGE_TOOL);
        assert!(tool.description.is_some());
    }

    #[tokio::test]
    async fn test_http_transport_serves_until_shutdown() {
        let (tx, rx) = shutdown_channel();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = tx.send(());
        });

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            McpServerBuilder::new(ImageServer::new(test_config(None)))
                .with_transport(Transport::http(0))
                .with_shutdown(rx)
                .run(),
        )
        .await
        .expect("server should stop after shutdown signal");
        assert!(result.is_ok(), "server returned error: {:?}", result.err());
    }
}
