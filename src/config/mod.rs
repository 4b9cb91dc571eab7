//! Configuration handling for the application.
//!
//! Everything is plain environment variables with development defaults,
//! loaded once at startup by `Config::from_env`. The completion-backend API
//! key is the only value without a default: starting without it would just
//! defer the failure to the first upstream call.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Environment variable names. Keeping them public lets tests and deployment
/// scripts refer to them.
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const ENV_BIND_ADDR: &str = "BIND_ADDR";
pub const ENV_STATIC_DIR: &str = "STATIC_DIR";
pub const ENV_OCR_URL: &str = "OCR_URL";

/// Default development values used when environment variables are absent.
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_OCR_URL: &str = "http://127.0.0.1:8884";

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    openai_api_key: String,
    openai_base_url: String,
    openai_model: String,
    bind_addr: String,
    static_dir: String,
    ocr_url: String,
}

impl Config {
    /// Create a config without consulting the environment.
    pub fn new(
        openai_api_key: impl Into<String>,
        openai_base_url: impl Into<String>,
        openai_model: impl Into<String>,
        bind_addr: impl Into<String>,
        static_dir: impl Into<String>,
        ocr_url: impl Into<String>,
    ) -> Self {
        Self {
            openai_api_key: openai_api_key.into(),
            openai_base_url: openai_base_url.into(),
            openai_model: openai_model.into(),
            bind_addr: bind_addr.into(),
            static_dir: static_dir.into(),
            ocr_url: ocr_url.into(),
        }
    }

    /// Load from environment variables, falling back to development defaults
    /// for everything except the API key.
    pub fn from_env() -> Result<Self, ConfigError> {
        let openai_api_key = env::var(ENV_OPENAI_API_KEY)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing {
                field: ENV_OPENAI_API_KEY,
            })?;
        let openai_base_url = env::var(ENV_OPENAI_BASE_URL)
            .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string());
        let openai_model =
            env::var(ENV_OPENAI_MODEL).unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string());
        let bind_addr = env::var(ENV_BIND_ADDR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let static_dir =
            env::var(ENV_STATIC_DIR).unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_string());
        let ocr_url = env::var(ENV_OCR_URL).unwrap_or_else(|_| DEFAULT_OCR_URL.to_string());
        Ok(Self {
            openai_api_key,
            openai_base_url,
            openai_model,
            bind_addr,
            static_dir,
            ocr_url,
        })
    }

    /// API key for the completion backend.
    pub fn openai_api_key(&self) -> &str {
        &self.openai_api_key
    }
    /// Base URL of the completion backend (overridable for tests).
    pub fn openai_base_url(&self) -> &str {
        &self.openai_base_url
    }
    /// Completion model name.
    pub fn openai_model(&self) -> &str {
        &self.openai_model
    }
    /// TCP bind address (host:port) for the HTTP server.
    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }
    /// Directory served as static assets; also holds `answers.json`.
    pub fn static_dir(&self) -> &str {
        &self.static_dir
    }
    /// Base URL of the external OCR service.
    pub fn ocr_url(&self) -> &str {
        &self.ocr_url
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A required variable was absent or empty.
    Missing { field: &'static str },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing { field } => {
                write!(f, "missing required environment variable '{}'", field)
            }
        }
    }
}

impl Error for ConfigError {}
