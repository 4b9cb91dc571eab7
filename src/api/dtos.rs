use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessHtmlRequest {
    /// Raw HTML of the page to process.
    pub html: Option<String>,
    /// Optional URL of an auxiliary document whose text is prepended to the
    /// page text before extraction.
    pub iframe_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessHtmlResponse {
    pub ok: bool,
    /// Answers recorded in this run.
    pub count: usize,
    /// Questions the extraction stage produced.
    pub total_questions: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImageAnswerResponse {
    pub text: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}
