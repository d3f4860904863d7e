//! Workspace-level integration tests for the Nano Banana MCP server.
//!
//! These tests verify:
//! - The server can be constructed and advertises tools and resources
//! - The `generate_image` tool schema matches its arguments
//! - Tool results are well-formed MCP content, including error results

pub mod output_format;
pub mod server_startup;
pub mod tool_schema;
