//! Question extraction stage: one completion call constrained to JSON,
//! followed by pure reply parsing and sanitization.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument};

use crate::llm::{CompletionBackend, CompletionRequest, LlmError};
use crate::normalizer::truncate_chars;
use crate::pipeline::model::Question;
use crate::pipeline::{Limits, prompts};

static LEADING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```[a-zA-Z]*\s*").unwrap());
static TRAILING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```\s*$").unwrap());

/// The backend reply could not be interpreted as question JSON. Carries an
/// excerpt of the raw reply for diagnostics.
#[derive(Error, Debug)]
#[error("failed to parse questions from completion reply")]
pub struct ParseQuestionsError {
    pub raw_excerpt: String,
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Parse(#[from] ParseQuestionsError),
}

/// Ask the backend for questions embedded in `text` and sanitize its reply.
/// An empty list is a valid "nothing found" outcome, not an error.
#[instrument(skip_all, fields(text_chars = text.chars().count()))]
pub async fn extract_questions(
    llm: &dyn CompletionBackend,
    text: &str,
    limits: &Limits,
) -> Result<Vec<Question>, ExtractError> {
    let request = CompletionRequest::new(
        prompts::extraction_prompt(text, limits),
        limits.extract_temperature,
        limits.extract_max_tokens,
    )
    .with_system(prompts::EXTRACT_SYSTEM);

    let raw = llm.complete(request).await?;
    let questions = parse_questions(&raw, limits)?;
    info!(count = questions.len(), "questions extracted");
    Ok(questions)
}

/// Remove a single surrounding fenced-block wrapper some backends add
/// around JSON replies.
pub fn strip_code_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_leading = LEADING_FENCE.replace(trimmed, "");
    TRAILING_FENCE.replace(&without_leading, "").trim().to_string()
}

/// Parse and sanitize the extraction reply. Accepts either a bare JSON
/// array or an object with a `questions` key. Entries without non-empty
/// text are dropped, the list is capped, survivors are re-numbered densely
/// from 1, text and options are clipped to the configured bounds.
pub fn parse_questions(raw: &str, limits: &Limits) -> Result<Vec<Question>, ParseQuestionsError> {
    let cleaned = strip_code_fences(raw);

    let parse_error = || ParseQuestionsError {
        raw_excerpt: truncate_chars(&cleaned, limits.raw_excerpt_chars),
    };

    let value: Value = serde_json::from_str(&cleaned).map_err(|_| parse_error())?;
    let entries = match &value {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("questions") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => return Err(parse_error()),
        },
        _ => return Err(parse_error()),
    };

    let questions = entries
        .iter()
        .filter_map(|entry| sanitize_entry(entry, limits))
        .take(limits.max_questions)
        .enumerate()
        .map(|(idx, (text, options))| Question {
            id: idx as u32 + 1,
            text,
            options,
        })
        .collect();

    Ok(questions)
}

fn sanitize_entry(entry: &Value, limits: &Limits) -> Option<(String, Option<Vec<String>>)> {
    let text = entry.get("text")?.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    let text = truncate_chars(text, limits.max_question_chars);

    let options = match entry.get("options") {
        Some(Value::Array(items)) => {
            let opts: Vec<String> = items
                .iter()
                .filter_map(|o| o.as_str())
                .map(|o| o.to_string())
                .take(limits.max_options)
                .collect();
            if opts.is_empty() { None } else { Some(opts) }
        }
        _ => None,
    };

    Some((text, options))
}
