//! Prompt text for the completion backend. Wording is an implementation
//! detail; the parsing contracts (JSON array of question objects, one
//! `<id>. <answer>` line per question) are what the stages depend on.

use crate::pipeline::Limits;
use crate::pipeline::model::Question;

pub const EXTRACT_SYSTEM: &str =
    "You extract questions from text. Respond ONLY with valid JSON and no surrounding prose.";

pub const IMAGE_SYSTEM: &str = "Answer the question concisely and accurately.";

/// User prompt for the question extraction call.
pub fn extraction_prompt(text: &str, limits: &Limits) -> String {
    format!(
        "Find all questions in the text below. Return a JSON array:\n\
         [{{\"id\":1,\"text\":\"question\",\"options\":[\"A\",\"B\"]}}]\n\n\
         Rules:\n\
         - Questions only; ignore navigation and page chrome\n\
         - Omit \"options\" when the question has no answer choices\n\
         - At most {} questions\n\
         - Question text at most {} characters\n\n\
         Text: {}",
        limits.max_questions, limits.max_question_chars, text
    )
}

/// Combined prompt for one answer batch: the questions, then the reply
/// format the line parser expects.
pub fn batch_prompt(batch: &[Question]) -> String {
    let mut prompt = String::from("Answer briefly (format: one line per question, `1. answer`), with no commentary or rephrasing:\n\n");
    for question in batch {
        prompt.push_str(&format!("{}. {}\n", question.id, question.text));
        if let Some(options) = &question.options {
            prompt.push_str(&format!("Options: {}\n", options.join(", ")));
        }
    }
    prompt
}
