//! Nano Banana MCP Common Library
//!
//! Shared configuration, error types, model definitions, tracing setup and
//! MCP transport plumbing for the Gemini image generation server.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod tracing;
pub mod transport;


pub use config::Config;
pub use error::{ConfigError, Error, Result};
pub use models::{ImageModel, ModelRegistry};
pub use server::{McpServerBuilder, ServerError, shutdown_channel};
pub use transport::{Transport, TransportArgs, TransportMode};
