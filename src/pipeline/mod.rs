//! The question/answer pipeline: normalize → extract → answer → persist.

pub mod answer;
pub mod extract;
pub mod model;
pub mod prompts;

pub use model::{Answer, Question};

use std::time::Duration;

use tracing::{info, warn};

use crate::errors::{AppError, AppResult};
use crate::fetcher;
use crate::llm::CompletionBackend;
use crate::normalizer::{normalize, truncate_chars};
use crate::pipeline::extract::ExtractError;
use crate::store::AnswerStore;

/// Tunable bounds of the pipeline. The source material disagrees on several
/// of these (question length, option count, input bound), so they are
/// configuration rather than hardcoded values; defaults are the most
/// permissive observed.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Characters of normalized text handed to the extraction call.
    pub max_input_chars: usize,
    /// Maximum questions kept from one extraction reply.
    pub max_questions: usize,
    /// Characters kept per question text.
    pub max_question_chars: usize,
    /// Options kept per question.
    pub max_options: usize,
    /// Questions per answer batch. Small batches keep each prompt short and
    /// the positional alignment of replies reliable.
    pub batch_size: usize,
    /// Pause between answer batches; a crude upstream-rate-limit throttle.
    pub batch_delay: Duration,
    pub extract_max_tokens: u32,
    pub extract_temperature: f32,
    pub answer_max_tokens: u32,
    pub answer_temperature: f32,
    /// Characters of a raw reply kept in parse-failure diagnostics.
    pub raw_excerpt_chars: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_chars: 6000,
            max_questions: 50,
            max_question_chars: 500,
            max_options: 10,
            batch_size: 3,
            batch_delay: Duration::from_millis(500),
            extract_max_tokens: 3000,
            extract_temperature: 0.1,
            answer_max_tokens: 1000,
            answer_temperature: 0.2,
            raw_excerpt_chars: 500,
        }
    }
}

/// What one `/process-html` run produced.
#[derive(Debug, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub answers_recorded: usize,
    pub total_questions: usize,
}

/// Run the full pipeline over the submitted HTML and optional auxiliary
/// document URL. Stages execute strictly in sequence; nothing is persisted
/// unless every answer batch succeeded.
pub async fn run(
    llm: &dyn CompletionBackend,
    store: &AnswerStore,
    limits: &Limits,
    html: Option<&str>,
    iframe_url: Option<&str>,
) -> AppResult<PipelineOutcome> {
    let text = gather_text(html, iframe_url, limits).await?;

    let questions = extract::extract_questions(llm, &text, limits)
        .await
        .map_err(|err| match err {
            ExtractError::Llm(e) => AppError::from(e),
            ExtractError::Parse(e) => AppError::ParseFailure {
                message: e.to_string(),
                raw: e.raw_excerpt,
            },
        })?;

    if questions.is_empty() {
        info!("no questions found");
        return Ok(PipelineOutcome {
            answers_recorded: 0,
            total_questions: 0,
        });
    }

    let answers = answer::answer_all(llm, &questions, limits).await?;
    store.append(&answers).await?;

    info!(
        questions = questions.len(),
        answers = answers.len(),
        "pipeline run complete"
    );
    Ok(PipelineOutcome {
        answers_recorded: answers.len(),
        total_questions: questions.len(),
    })
}

/// Normalize the primary document and, when an auxiliary URL is given,
/// prepend its normalized text. The auxiliary fetch is best-effort: any
/// failure is logged and the primary document is used alone.
async fn gather_text(
    html: Option<&str>,
    iframe_url: Option<&str>,
    limits: &Limits,
) -> AppResult<String> {
    let primary = html.map(normalize).unwrap_or_default();

    let auxiliary = match iframe_url {
        Some(url) => match fetcher::fetch(url).await {
            Ok(doc) => normalize(&doc.body_utf8),
            Err(err) => {
                warn!(error = %err, url, "auxiliary fetch failed, continuing without it");
                String::new()
            }
        },
        None => String::new(),
    };

    let combined = match (auxiliary.is_empty(), primary.is_empty()) {
        (true, true) => {
            return Err(AppError::BadRequest(
                "no text content found in the submitted documents".to_string(),
            ));
        }
        (true, false) => primary,
        (false, true) => auxiliary,
        (false, false) => format!("{auxiliary}\n\n{primary}"),
    };

    Ok(truncate_chars(&combined, limits.max_input_chars))
}
