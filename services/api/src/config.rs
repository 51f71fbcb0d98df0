//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The
//! `.env` file is used for local development. Both provider keys are
//! optional: without them the service runs on its deterministic fallbacks.

use std::net::SocketAddr;
use tracing::Level;

/// Default OpenAI-compatible endpoint of the Gemini API.
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const DEFAULT_UNSPLASH_API_BASE: &str = "https://api.unsplash.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Uploads above this size are rejected before any parsing happens.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub gemini_api_key: Option<String>,
    pub gemini_api_base: String,
    pub enhancer_model: String,
    pub question_model: String,
    pub unsplash_api_key: Option<String>,
    pub unsplash_api_base: String,
    pub max_upload_bytes: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:5000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Load API Keys (as optional) ---
        let gemini_api_key = std::env::var("GEMINI_API_KEY").ok();
        let unsplash_api_key = std::env::var("UNSPLASH_API_KEY").ok();

        // --- Load Provider-specific Settings ---
        let gemini_api_base = std::env::var("GEMINI_API_BASE")
            .unwrap_or_else(|_| DEFAULT_GEMINI_API_BASE.to_string());
        let unsplash_api_base = std::env::var("UNSPLASH_API_BASE")
            .unwrap_or_else(|_| DEFAULT_UNSPLASH_API_BASE.to_string());
        let enhancer_model =
            std::env::var("ENHANCER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let question_model =
            std::env::var("QUESTION_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let max_upload_bytes = match std::env::var("MAX_UPLOAD_BYTES") {
            Ok(raw) => raw.parse::<usize>().map_err(|e| {
                ConfigError::InvalidValue("MAX_UPLOAD_BYTES".to_string(), e.to_string())
            })?,
            Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            bind_address,
            log_level,
            gemini_api_key,
            gemini_api_base,
            enhancer_model,
            question_model,
            unsplash_api_key,
            unsplash_api_base,
            max_upload_bytes,
        })
    }
}
