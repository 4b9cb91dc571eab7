//! Batched answer stage. Questions go to the backend in small fixed-size
//! batches, strictly in sequence, and the free-text reply is aligned back
//! to question ids by a line-oriented state machine.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, instrument};

use crate::llm::{CompletionBackend, CompletionRequest, LlmError};
use crate::pipeline::model::{Answer, Question};
use crate::pipeline::{Limits, prompts};

static LEADING_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)[.):\s]+(.+)").unwrap());

/// Obtain an answer for every question the backend replies to. Batches are
/// processed one at a time with a fixed pause in between as a crude
/// throttle against upstream rate limiting. A failed call aborts the whole
/// stage; partial results from earlier batches are discarded by the caller.
#[instrument(skip_all, fields(questions = questions.len()))]
pub async fn answer_all(
    llm: &dyn CompletionBackend,
    questions: &[Question],
    limits: &Limits,
) -> Result<Vec<Answer>, LlmError> {
    let mut answers = Vec::new();
    let batches: Vec<&[Question]> = questions.chunks(limits.batch_size).collect();

    for (index, batch) in batches.iter().enumerate() {
        let request = CompletionRequest::new(
            prompts::batch_prompt(batch),
            limits.answer_temperature,
            limits.answer_max_tokens,
        );
        let reply = llm.complete(request).await?;

        let parsed = parse_answer_lines(&reply, batch);
        debug!(
            batch = index,
            asked = batch.len(),
            answered = parsed.len(),
            "batch answered"
        );
        answers.extend(parsed);

        if index + 1 < batches.len() {
            tokio::time::sleep(limits.batch_delay).await;
        }
    }

    Ok(answers)
}

/// Align a free-text reply to the questions of one batch.
///
/// Each line starting with a number opens an answer for that id; following
/// lines without a leading number continue it, space-joined. Ids that do
/// not belong to the batch are dropped. Pure, so malformed backend output
/// can be tested without a live backend.
pub fn parse_answer_lines(reply: &str, batch: &[Question]) -> Vec<Answer> {
    let mut answers = Vec::new();
    let mut current_id: Option<u32> = None;
    let mut buffer = String::new();

    let flush = |id: Option<u32>, buffer: &str, answers: &mut Vec<Answer>| {
        let Some(id) = id else { return };
        let text = buffer.trim();
        if text.is_empty() {
            return;
        }
        // Unknown ids are silently dropped; the question text is copied
        // verbatim from the batch, never re-derived.
        if let Some(question) = batch.iter().find(|q| q.id == id) {
            answers.push(Answer {
                id,
                question: question.text.clone(),
                answer: text.to_string(),
            });
        }
    };

    for line in reply.lines() {
        if let Some(captures) = LEADING_NUMBER.captures(line) {
            flush(current_id, &buffer, &mut answers);
            current_id = captures[1].parse().ok();
            buffer = captures[2].to_string();
        } else if current_id.is_some() && !line.trim().is_empty() {
            buffer.push(' ');
            buffer.push_str(line.trim());
        }
    }
    flush(current_id, &buffer, &mut answers);

    answers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u32, text: &str) -> Question {
        Question {
            id,
            text: text.to_string(),
            options: None,
        }
    }

    #[test]
    fn parses_one_line_per_question() {
        let batch = vec![question(1, "Capital of France?"), question(2, "2 + 2?")];
        let answers = parse_answer_lines("1. Paris\n2. Four", &batch);
        assert_eq!(answers.len(), 2);
        assert_eq!(answers[0].id, 1);
        assert_eq!(answers[0].question, "Capital of France?");
        assert_eq!(answers[0].answer, "Paris");
        assert_eq!(answers[1].answer, "Four");
    }

    #[test]
    fn accepts_alternate_number_separators() {
        let batch = vec![question(1, "a"), question(2, "b"), question(3, "c")];
        let answers = parse_answer_lines("1) one\n2: two\n3 three", &batch);
        let texts: Vec<&str> = answers.iter().map(|a| a.answer.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn joins_continuation_lines_in_order() {
        let batch = vec![question(1, "q1"), question(2, "q2")];
        let reply = "1. First part\nsecond part\n  third part  \n2. Short";
        let answers = parse_answer_lines(reply, &batch);
        assert_eq!(answers[0].answer, "First part second part third part");
        assert_eq!(answers[1].answer, "Short");
    }

    #[test]
    fn blank_lines_do_not_break_continuations() {
        let batch = vec![question(1, "q1")];
        let answers = parse_answer_lines("1. start\n\ncontinued", &batch);
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].answer, "start continued");
    }

    #[test]
    fn unknown_ids_are_dropped() {
        let batch = vec![question(1, "q1")];
        let answers = parse_answer_lines("1. yes\n9. stray", &batch);
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].id, 1);
    }

    #[test]
    fn commentary_before_first_number_is_ignored() {
        let batch = vec![question(1, "q1")];
        let answers = parse_answer_lines("Here are your answers:\n1. Paris", &batch);
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].answer, "Paris");
    }

    #[test]
    fn out_of_order_ids_are_kept() {
        let batch = vec![question(1, "q1"), question(2, "q2")];
        let answers = parse_answer_lines("2. two\n1. one", &batch);
        assert_eq!(answers[0].id, 2);
        assert_eq!(answers[1].id, 1);
    }

    #[test]
    fn empty_reply_yields_nothing() {
        let batch = vec![question(1, "q1")];
        assert!(parse_answer_lines("", &batch).is_empty());
        assert!(parse_answer_lines("no numbers here", &batch).is_empty());
    }

    #[tokio::test]
    async fn answer_all_batches_sequentially() {
        use crate::llm::MockCompletionBackend;

        let questions: Vec<Question> = (1..=7).map(|i| question(i, &format!("q{i}"))).collect();

        let mut llm = MockCompletionBackend::new();
        // 7 questions with batch size 3 -> 3 calls.
        llm.expect_complete().times(3).returning(|req| {
            // Echo back an answer line for every id mentioned in the prompt.
            let reply = req
                .user
                .lines()
                .filter_map(|l| l.split_once(". ").map(|(id, _)| id))
                .filter(|id| id.parse::<u32>().is_ok())
                .map(|id| format!("{id}. answer {id}"))
                .collect::<Vec<_>>()
                .join("\n");
            Ok(reply)
        });

        let limits = Limits {
            batch_delay: std::time::Duration::from_millis(0),
            ..Limits::default()
        };
        let answers = answer_all(&llm, &questions, &limits).await.unwrap();
        assert_eq!(answers.len(), 7);
        assert_eq!(answers[6].id, 7);
        assert_eq!(answers[6].question, "q7");
    }

    #[tokio::test]
    async fn answer_all_propagates_backend_failure() {
        use crate::llm::{LlmError, MockCompletionBackend};

        let questions = vec![question(1, "q1")];
        let mut llm = MockCompletionBackend::new();
        llm.expect_complete().times(1).returning(|_| {
            Err(LlmError::Http {
                status: 429,
                body: "rate limited".into(),
            })
        });

        let result = answer_all(&llm, &questions, &Limits::default()).await;
        assert!(result.is_err());
    }
}
