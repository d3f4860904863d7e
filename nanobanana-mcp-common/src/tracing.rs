//! Tracing initialization for the MCP server.
//!
//! Log output always goes to stderr: with the stdio transport, stdout carries
//! the JSON-RPC stream and must not receive anything else.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Controls the log level and filtering. Examples:
//!   - `RUST_LOG=debug` - Enable debug logging for all modules
//!   - `RUST_LOG=nanobanana_mcp_image=debug` - Enable debug for the image server
//!   - `RUST_LOG=warn,nanobanana_mcp_common=debug` - Warn by default, debug for common
//!
//! When `RUST_LOG` is unset the caller-supplied default level applies.

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize the global subscriber, defaulting to `default_level`.
///
/// # Panics
///
/// Panics if a global subscriber has already been installed.
///
/// # Example
///
/// ```no_run
/// use nanobanana_mcp_common::tracing::init_tracing;
///
/// init_tracing("info");
/// tracing::info!("Server starting");
/// ```
pub fn init_tracing(default_level: &str) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(fmt_layer)
        .init();
}
