use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A question recognized in the submitted content. Ids are assigned by the
/// extraction stage as a dense `1..=N` sequence; whatever the backend sent
/// is discarded. Lives only for the duration of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// A persisted question/answer pair. `question` is always the verbatim text
/// of the question the id refers to, copied at emission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Answer {
    pub id: u32,
    pub question: String,
    pub answer: String,
}
