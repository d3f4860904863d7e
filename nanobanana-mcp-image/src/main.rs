//! Nano Banana MCP Image Server
//!
//! MCP server for image generation using Gemini image models.

use anyhow::Result;
use clap::Parser;
use nanobanana_mcp_common::tracing::init_tracing;
use nanobanana_mcp_common::{Config, McpServerBuilder, TransportArgs};
use nanobanana_mcp_image::ImageServer;

/// Command-line arguments for the image server.
#[derive(Parser, Debug)]
#[command(name = "nanobanana-mcp-image")]
#[command(about = "MCP server for image generation using Gemini (Nano Banana)")]
struct Args {
    /// Transport configuration
    #[command(flatten)]
    transport: TransportArgs,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level);
    tracing::info!("nanobanana-mcp-image server starting...");

    let config = Config::from_env();
    if config.has_api_key() {
        tracing::info!(api_base_url = %config.api_base_url, "Configuration loaded");
    } else {
        tracing::warn!(
            api_base_url = %config.api_base_url,
            "No API key configured; generate_image calls will fail until GEMINI_API_KEY is set"
        );
    }

    let server = ImageServer::new(config);

    let transport = args.transport.into_transport();
    tracing::info!(transport = %transport, "Starting MCP server");

    McpServerBuilder::new(server)
        .with_transport(transport)
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
