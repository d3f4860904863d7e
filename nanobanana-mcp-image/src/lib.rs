//! Nano Banana MCP Image Server Library
//!
//! This library provides image generation and editing through Gemini's
//! `generateContent` API, exposed as a single MCP tool.

pub mod fallback;
pub mod handler;
pub mod loader;
pub mod mime;
pub mod resources;
pub mod server;

pub use fallback::FallbackState;
pub use handler::{AspectRatio, GenerationRequest, GenerationResult, ImageHandler, OutputFormat};
pub use loader::EncodedImage;
pub use server::{GenerateImageToolParams, ImageServer};
