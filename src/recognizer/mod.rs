//! Image text extraction capability. OCR is an external collaborator; this
//! module only defines the capability trait plus a thin HTTP client for a
//! tesseract-server style endpoint.

pub mod http;

pub use http::HttpOcr;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecognizeError {
    #[error("ocr service returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed ocr response: {0}")]
    Malformed(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Run recognition over raw image bytes and return the recognized text.
    /// An empty result is not an error at this level; the caller decides.
    async fn recognize(&self, image: &[u8]) -> Result<String, RecognizeError>;
}
