//! HTTP surface: routes, DTOs and the OpenAPI document. Anything that is
//! not an API route falls through to static file serving from the
//! configured assets directory.

pub mod dtos;
pub mod handlers;

use axum::{
    Json, Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;

use crate::app_state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::process_html,
        handlers::get_answers,
        handlers::clear_answers,
        handlers::ask_image,
        handlers::health_check,
    ),
    components(schemas(
        dtos::ProcessHtmlRequest,
        dtos::ProcessHtmlResponse,
        dtos::OkResponse,
        dtos::ImageAnswerResponse,
        dtos::HealthResponse,
        crate::pipeline::Answer,
        crate::errors::ErrorBody,
    ))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router. `static_dir` is served for any path no
/// API route claims (the original deployment ships its UI that way).
pub fn router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/process-html", post(handlers::process_html))
        .route("/json", get(handlers::get_answers))
        .route("/clear-answers", post(handlers::clear_answers))
        .route("/ask-image-gpt", post(handlers::ask_image))
        .route("/healthz", get(handlers::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
