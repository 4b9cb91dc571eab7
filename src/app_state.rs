use std::sync::Arc;

use crate::llm::CompletionBackend;
use crate::pipeline::Limits;
use crate::recognizer::TextRecognizer;
use crate::store::AnswerStore;

/// Shared handler state. Both network capabilities are trait objects so
/// tests can swap in deterministic stubs.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn CompletionBackend>,
    pub ocr: Arc<dyn TextRecognizer>,
    pub store: AnswerStore,
    pub limits: Limits,
}

impl AppState {
    pub fn new(
        llm: Arc<dyn CompletionBackend>,
        ocr: Arc<dyn TextRecognizer>,
        store: AnswerStore,
        limits: Limits,
    ) -> Self {
        Self {
            llm,
            ocr,
            store,
            limits,
        }
    }
}
