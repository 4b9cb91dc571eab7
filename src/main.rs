use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use quizpipe::{
    api, app_state::AppState, config::Config, llm::OpenAiBackend, pipeline::Limits,
    recognizer::HttpOcr, store::AnswerStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quizpipe=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("failed to load configuration")?;

    let llm = Arc::new(OpenAiBackend::new(
        config.openai_base_url(),
        config.openai_api_key(),
        config.openai_model(),
    ));
    let ocr = Arc::new(HttpOcr::new(config.ocr_url()));
    let store = AnswerStore::new(Path::new(config.static_dir()).join("answers.json"));
    let state = AppState::new(llm, ocr, store, Limits::default());

    let app = api::router(state, config.static_dir());

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    info!(addr = config.bind_addr(), "quizpipe listening");
    axum::serve(listener, app).await?;

    Ok(())
}
