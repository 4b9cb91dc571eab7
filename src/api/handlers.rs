use axum::{
    Json,
    extract::{Multipart, State},
};
use tracing::{info, instrument, warn};

use crate::api::dtos::{
    HealthResponse, ImageAnswerResponse, OkResponse, ProcessHtmlRequest, ProcessHtmlResponse,
};
use crate::app_state::AppState;
use crate::errors::{AppError, AppResult, ErrorBody};
use crate::llm::CompletionRequest;
use crate::pipeline::{self, prompts};

#[utoipa::path(
    post,
    path = "/process-html",
    tag = "pipeline",
    request_body = ProcessHtmlRequest,
    responses(
        (status = 200, description = "Questions extracted and answers persisted", body = ProcessHtmlResponse),
        (status = 400, description = "No content, or the backend reply could not be parsed", body = ErrorBody),
        (status = 500, description = "Completion backend failure", body = ErrorBody)
    )
)]
#[instrument(skip_all)]
pub async fn process_html(
    State(state): State<AppState>,
    Json(payload): Json<ProcessHtmlRequest>,
) -> AppResult<Json<ProcessHtmlResponse>> {
    let html = payload
        .html
        .as_deref()
        .filter(|value| !value.trim().is_empty());
    let iframe_url = payload
        .iframe_url
        .as_deref()
        .filter(|value| !value.trim().is_empty());

    if html.is_none() && iframe_url.is_none() {
        return Err(AppError::BadRequest("html required".to_string()));
    }

    let outcome = pipeline::run(
        state.llm.as_ref(),
        &state.store,
        &state.limits,
        html,
        iframe_url,
    )
    .await?;

    Ok(Json(ProcessHtmlResponse {
        ok: true,
        count: outcome.answers_recorded,
        total_questions: outcome.total_questions,
    }))
}

#[utoipa::path(
    get,
    path = "/json",
    tag = "store",
    responses(
        (status = 200, description = "Full answer store", body = [crate::pipeline::Answer]),
        (status = 404, description = "Store missing or unreadable", body = ErrorBody)
    )
)]
pub async fn get_answers(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<crate::pipeline::Answer>>> {
    let answers = state.store.read_all().await?;
    Ok(Json(answers))
}

#[utoipa::path(
    post,
    path = "/clear-answers",
    tag = "store",
    responses(
        (status = 200, description = "Store reset to an empty sequence", body = OkResponse),
        (status = 500, description = "Write failure", body = ErrorBody)
    )
)]
pub async fn clear_answers(State(state): State<AppState>) -> AppResult<Json<OkResponse>> {
    state.store.clear().await?;
    info!("answer store cleared");
    Ok(Json(OkResponse { ok: true }))
}

#[utoipa::path(
    post,
    path = "/ask-image-gpt",
    tag = "pipeline",
    responses(
        (status = 200, description = "Answer for the question recognized in the image", body = ImageAnswerResponse),
        (status = 400, description = "No file uploaded or no text detected", body = ErrorBody),
        (status = 500, description = "OCR or completion backend failure", body = ErrorBody)
    )
)]
#[instrument(skip_all)]
pub async fn ask_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ImageAnswerResponse>> {
    let mut image: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        if !data.is_empty() {
            image = Some(data.to_vec());
            break;
        }
    }
    let image = image.ok_or(AppError::NoFile)?;

    let recognized = state.ocr.recognize(&image).await?;
    let recognized = recognized.trim();
    if recognized.is_empty() {
        warn!("ocr produced no text");
        return Err(AppError::NoTextDetected);
    }

    let request = CompletionRequest::new(
        recognized,
        state.limits.answer_temperature,
        state.limits.answer_max_tokens,
    )
    .with_system(prompts::IMAGE_SYSTEM);
    let reply = state.llm.complete(request).await?;

    // The image path returns the answer directly; nothing is persisted.
    Ok(Json(ImageAnswerResponse { text: reply }))
}

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
    })
}
