//! Best-effort fetch of an auxiliary document (the `iframeUrl` a caller can
//! pass alongside raw HTML). Failures here never fail a pipeline run; the
//! caller logs and continues with the primary document only.

pub mod client;
pub mod decode;
pub mod errors;

pub use client::fetch;
pub use errors::FetchError;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use url::Url;

/// A fetched and UTF-8 decoded document.
#[derive(Debug)]
pub struct FetchedDocument {
    pub url_final: Url,
    pub status: StatusCode,
    pub body_utf8: String,
    pub fetched_at: DateTime<Utc>,
}
