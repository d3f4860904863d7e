//! Configuration module for loading environment variables and settings.

use std::fmt;

/// Primary environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Secondary environment variable consulted when `GEMINI_API_KEY` is unset.
pub const FALLBACK_API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Environment variable overriding the Gemini models base URL.
pub const API_BASE_URL_ENV: &str = "GEMINI_API_BASE_URL";

/// Default base URL for the Gemini `models` collection.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Application configuration loaded from environment variables.
///
/// A missing API key is not an error here: the server still starts and every
/// tool call reports the missing credential instead.
#[derive(Clone)]
pub struct Config {
    /// Gemini API key, sent as `x-goog-api-key`
    pub api_key: Option<String>,
    /// Base URL of the `models` collection, without a trailing slash
    pub api_base_url: String,
}

impl Config {
    /// Build a configuration with an explicit key and the default base URL.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Override the base URL (used for proxies and mock servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api_base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Load configuration from environment variables and .env file.
    pub fn from_env() -> Self {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// `GEMINI_API_KEY` wins unless blank, then `GOOGLE_API_KEY`. A non-blank
    /// `GEMINI_API_BASE_URL` replaces the default base URL.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup(API_KEY_ENV)
            .filter(|k| !k.trim().is_empty())
            .or_else(|| lookup(FALLBACK_API_KEY_ENV));

        let config = Self::new(api_key);
        match lookup(API_BASE_URL_ENV) {
            Some(url) if !url.trim().is_empty() => config.with_base_url(url.trim()),
            _ => config,
        }
    }

    /// Whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Get the `generateContent` endpoint URL for a given model.
    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/{}:generateContent", self.api_base_url, model)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}
