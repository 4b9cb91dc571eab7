use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::llm::LlmError;
use crate::recognizer::RecognizeError;
use crate::store::StoreError;

/// Request-level error taxonomy. Every handler failure funnels into one of
/// these variants and is rendered as a JSON body with a matching status.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    /// The completion backend replied with something we could not parse.
    /// Carries an excerpt of the raw reply for diagnosis; surfaced as a
    /// client error because it stems from unpredictable model output, not
    /// a fault in this service.
    #[error("{message}")]
    ParseFailure { message: String, raw: String },

    #[error("image file is required")]
    NoFile,

    #[error("no text detected in image")]
    NoTextDetected,

    #[error("{0}")]
    NotFound(String),

    #[error("upstream failure: {0}")]
    Upstream(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_)
            | AppError::ParseFailure { .. }
            | AppError::NoFile
            | AppError::NoTextDetected => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let raw = match &self {
            AppError::ParseFailure { raw, .. } => Some(raw.clone()),
            _ => None,
        };
        let body = ErrorBody {
            error: self.to_string(),
            raw,
        };
        (status, Json(body)).into_response()
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl From<RecognizeError> for AppError {
    fn from(err: RecognizeError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => AppError::NotFound(err.to_string()),
            StoreError::Io(_) | StoreError::Decode(_) | StoreError::Encode(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
