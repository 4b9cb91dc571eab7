//! Completion backend capability. The pipeline only ever sees the
//! [`CompletionBackend`] trait, so stages are testable with deterministic
//! stubs instead of live network calls.

pub mod openai;

pub use openai::OpenAiBackend;

use async_trait::async_trait;
use thiserror::Error;

/// One completion call: an optional system instruction, a user prompt and
/// sampling parameters. Every call is a fresh conversation; no state is
/// shared between requests.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(user: impl Into<String>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            system: None,
            user: user.into(),
            temperature,
            max_tokens,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("backend returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed backend response: {0}")]
    MalformedResponse(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send one prompt and return the reply text.
    async fn complete(&self, req: CompletionRequest) -> Result<String, LlmError>;
}
