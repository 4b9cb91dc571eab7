//! Client for a tesseract-server style OCR endpoint
//! (`POST {base}/tesseract` with a multipart `options` + `file` form).

use async_trait::async_trait;
use reqwest::{Client, multipart};
use serde_json::{Value, json};
use tracing::instrument;

use crate::recognizer::{RecognizeError, TextRecognizer};

/// Quiz screenshots in our source domain mix English and Russian.
const LANGUAGES: &[&str] = &["eng", "rus"];

pub struct HttpOcr {
    http: Client,
    base_url: String,
}

impl HttpOcr {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl TextRecognizer for HttpOcr {
    #[instrument(skip_all, fields(bytes = image.len()))]
    async fn recognize(&self, image: &[u8]) -> Result<String, RecognizeError> {
        let url = format!("{}/tesseract", self.base_url);
        let options = json!({ "languages": LANGUAGES }).to_string();

        // Part::bytes needs an owned buffer; clone at the client boundary.
        let form = multipart::Form::new().text("options", options).part(
            "file",
            multipart::Part::bytes(image.to_vec()).file_name("upload"),
        );

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RecognizeError::Network(e.to_string()))?;

        let status = response.status();
        let payload = response
            .text()
            .await
            .map_err(|e| RecognizeError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(RecognizeError::Http {
                status: status.as_u16(),
                body: payload,
            });
        }

        let value: Value = serde_json::from_str(&payload)
            .map_err(|e| RecognizeError::Malformed(e.to_string()))?;
        let text = value["data"]["stdout"]
            .as_str()
            .ok_or_else(|| RecognizeError::Malformed("missing data.stdout".to_string()))?;

        Ok(text.trim().to_string())
    }
}
