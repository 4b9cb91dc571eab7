use crate::fetcher::{FetchedDocument, decode::decode_body, errors::FetchError};
use chrono::Utc;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::instrument;

/// The auxiliary fetch is an enrichment, not a dependency, so it gets a hard
/// overall deadline instead of stalling a pipeline run.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const USER_AGENT: &str = "quizpipe/0.1";

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .timeout(FETCH_TIMEOUT)
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .expect("Failed to build HTTP client")
});

/// Fetch `url` and decode the body to UTF-8, honoring declared or sniffed
/// charsets (quiz pages in the wild are frequently windows-1251).
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch(url: &str) -> Result<FetchedDocument, FetchError> {
    let parsed_url = url::Url::parse(url)?;

    let response = HTTP_CLIENT
        .get(parsed_url)
        .send()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    let url_final = response.url().clone();
    let status = response.status();

    if !status.is_success() {
        return Err(FetchError::Http { status });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or("text/html")
        .to_string();

    let body_bytes = response
        .bytes()
        .await
        .map_err(|e| FetchError::Io(e.to_string()))?;

    let body_utf8 = decode_body(&content_type, &body_bytes)?;

    Ok(FetchedDocument {
        url_final,
        status,
        body_utf8,
        fetched_at: Utc::now(),
    })
}
