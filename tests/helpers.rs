use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use std::sync::Arc;

use quizpipe::{
    api,
    app_state::AppState,
    llm::{CompletionBackend, CompletionRequest, LlmError},
    pipeline::Limits,
    recognizer::{RecognizeError, TextRecognizer},
    store::AnswerStore,
};

/// One scripted backend reply, consumed in order.
pub enum ScriptedReply {
    Text(String),
    Fail(String),
}

/// Deterministic completion backend for handler tests: pops scripted
/// replies, counts calls and records the user prompts it was sent.
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<ScriptedReply>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    #[allow(dead_code)] // not every test binary inspects prompts
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, req: CompletionRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(req.user);
        match self.replies.lock().unwrap().pop_front() {
            Some(ScriptedReply::Text(text)) => Ok(text),
            Some(ScriptedReply::Fail(message)) => Err(LlmError::Network(message)),
            None => Err(LlmError::Network("no scripted reply left".to_string())),
        }
    }
}

/// Recognizer stub returning a fixed text for any image.
pub struct StubRecognizer {
    pub text: String,
}

#[async_trait]
impl TextRecognizer for StubRecognizer {
    async fn recognize(&self, _image: &[u8]) -> Result<String, RecognizeError> {
        Ok(self.text.clone())
    }
}

/// Build the application router over a temp directory, with zero inter-batch
/// delay so multi-batch tests stay fast.
pub fn test_app(llm: Arc<ScriptedBackend>, ocr_text: &str, dir: &Path) -> Router {
    let limits = Limits {
        batch_delay: Duration::from_millis(0),
        ..Limits::default()
    };
    let store = AnswerStore::new(dir.join("answers.json"));
    let state = AppState::new(
        llm,
        Arc::new(StubRecognizer {
            text: ocr_text.to_string(),
        }),
        store,
        limits,
    );
    api::router(state, dir.to_str().unwrap())
}
