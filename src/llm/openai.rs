//! OpenAI chat-completions implementation of [`CompletionBackend`].

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::instrument;

use crate::llm::{CompletionBackend, CompletionRequest, LlmError};

pub struct OpenAiBackend {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    /// `base_url` is the scheme+host part only (e.g. `https://api.openai.com`);
    /// the chat-completions path is appended per call.
    ///
    /// The dedicated client carries no request timeout: a slow completion
    /// stalls its request rather than failing it, matching the pipeline's
    /// run-to-completion model.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    #[instrument(skip_all, fields(model = %self.model, max_tokens = req.max_tokens))]
    async fn complete(&self, req: CompletionRequest) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut messages = Vec::new();
        if let Some(system) = &req.system {
            messages.push(json!({ "role": "system", "content": system }));
        }
        messages.push(json!({ "role": "user", "content": req.user }));

        let body = json!({
            "model": self.model,
            "messages": messages,
            "temperature": req.temperature,
            "max_tokens": req.max_tokens,
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        let payload = response
            .text()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(LlmError::Http {
                status: status.as_u16(),
                body: payload,
            });
        }

        let value: Value = serde_json::from_str(&payload)
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;
        let content = value["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                LlmError::MalformedResponse("missing choices[0].message.content".to_string())
            })?;

        Ok(content.trim().to_string())
    }
}
