//! Error types for the common library.
//!
//! This module provides a unified error hierarchy using `thiserror`. Every
//! failure raised while serving a tool call is one of these variants, so the
//! tool boundary can report it uniformly.
//!
//! # Error Categories
//!
//! - `ConfigError`: Missing configuration (e.g. no API key)
//! - `Error::ImageRead`: A reference image could not be read
//! - `Error::Api`: Non-success HTTP status from the Gemini API (includes endpoint and status)
//! - `Error::Payload`: A successful HTTP response whose body reports an error or is unusable
//! - `Error::NoContent`: The model returned no text and no image
//! - `Error::Validation`: Input validation failures
//! - `Error::OutputWrite`: The generated image could not be written to disk

use thiserror::Error;

/// Unified error type for the common library.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors (missing env vars, invalid values)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A reference image could not be read from the filesystem
    #[error("Failed to read image {path}: {source}")]
    ImageRead {
        /// Path that was being read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// API errors with endpoint and HTTP status context
    ///
    /// `status_code` is 0 when the request failed before a response arrived.
    #[error("API error for {endpoint} (HTTP {status_code}): {message}")]
    Api {
        /// The API endpoint that was called
        endpoint: String,
        /// HTTP status code returned by the API
        status_code: u16,
        /// Raw response body, or a description of the failure
        message: String,
    },

    /// The API answered with a success status but the payload carries an
    /// error object or cannot be used
    #[error("API returned an error: {0}")]
    Payload(String),

    /// The response contained no usable text or image
    #[error("No content generated by the model")]
    NoContent,

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// The generated image could not be written to its output path
    #[error("Failed to write image to {path}: {source}")]
    OutputWrite {
        /// Destination path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a new API error with endpoint, status code, and message.
    ///
    /// # Example
    ///
    /// ```
    /// use nanobanana_mcp_common::error::Error;
    ///
    /// let err = Error::api(
    ///     "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-image:generateContent",
    ///     429,
    ///     "Resource has been exhausted"
    /// );
    /// assert!(err.to_string().contains("429"));
    /// assert!(err.to_string().contains("Resource has been exhausted"));
    /// ```
    pub fn api(endpoint: impl Into<String>, status_code: u16, message: impl Into<String>) -> Self {
        Error::Api {
            endpoint: endpoint.into(),
            status_code,
            message: message.into(),
        }
    }

    /// Create a new payload error.
    ///
    /// # Example
    ///
    /// ```
    /// use nanobanana_mcp_common::error::Error;
    ///
    /// let err = Error::payload("API key not valid");
    /// assert!(err.to_string().contains("API key not valid"));
    /// ```
    pub fn payload(message: impl Into<String>) -> Self {
        Error::Payload(message.into())
    }

    /// Create a new validation error.
    ///
    /// # Example
    ///
    /// ```
    /// use nanobanana_mcp_common::error::Error;
    ///
    /// let err = Error::validation("imagePaths: at most 14 images");
    /// assert!(err.to_string().contains("at most 14"));
    /// ```
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Create an error for a reference image that could not be read.
    pub fn image_read(path: impl Into<String>, source: std::io::Error) -> Self {
        Error::ImageRead {
            path: path.into(),
            source,
        }
    }

    /// Create an error for an output file that could not be written.
    pub fn output_write(path: impl Into<String>, source: std::io::Error) -> Self {
        Error::OutputWrite {
            path: path.into(),
            source,
        }
    }

    /// HTTP status carried by the error, if it came from the API.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

/// Configuration errors.
///
/// Raised at call time when a required setting was absent at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Required environment variable {0} is not set")]
    MissingEnvVar(String),
}

impl ConfigError {
    /// Create a new missing environment variable error.
    pub fn missing_env_var(name: impl Into<String>) -> Self {
        ConfigError::MissingEnvVar(name.into())
    }
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;
