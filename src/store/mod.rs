//! Append-only answer store persisted as one pretty-printed JSON array.
//!
//! Writes are plain read-modify-write with no locking, matching the
//! original deployment where a single user drives the service. Two
//! concurrent appends race and the last write wins; upgrading this to a
//! file lock or single-writer task would change observable behavior and is
//! deliberately not done here.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::pipeline::model::Answer;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0} not found or unreadable")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("encode error: {0}")]
    Encode(String),
}

#[derive(Debug, Clone)]
pub struct AnswerStore {
    path: PathBuf,
}

impl AnswerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `answers` after whatever the file already holds. A missing or
    /// corrupt existing file is treated as empty so appends always succeed;
    /// the unreadable prior content is discarded with a warning.
    pub async fn append(&self, answers: &[Answer]) -> Result<(), StoreError> {
        let mut existing = match self.read_parsed().await {
            Ok(list) => list,
            Err(err) => {
                warn!(error = %err, path = %self.path.display(), "starting from an empty store");
                Vec::new()
            }
        };
        existing.extend_from_slice(answers);
        self.write_all(&existing).await?;
        debug!(
            appended = answers.len(),
            total = existing.len(),
            "answers persisted"
        );
        Ok(())
    }

    /// Read the full store. Missing or unparsable content is a caller-visible
    /// not-found condition here, unlike in `append`.
    pub async fn read_all(&self) -> Result<Vec<Answer>, StoreError> {
        self.read_parsed()
            .await
            .map_err(|_| StoreError::NotFound(self.path.display().to_string()))
    }

    /// Reset the store to an empty sequence.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.write_all(&[]).await
    }

    async fn read_parsed(&self) -> Result<Vec<Answer>, StoreError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn write_all(&self, answers: &[Answer]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Io(e.to_string()))?;
        }
        let encoded =
            serde_json::to_string_pretty(answers).map_err(|e| StoreError::Encode(e.to_string()))?;
        tokio::fs::write(&self.path, encoded)
            .await
            .map_err(|e| StoreError::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(id: u32, question: &str, text: &str) -> Answer {
        Answer {
            id,
            question: question.to_string(),
            answer: text.to_string(),
        }
    }

    fn temp_store() -> (tempfile::TempDir, AnswerStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = AnswerStore::new(dir.path().join("answers.json"));
        (dir, store)
    }

    #[tokio::test]
    async fn read_all_on_missing_file_is_not_found() {
        let (_dir, store) = temp_store();
        assert!(matches!(
            store.read_all().await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn append_accumulates_in_order() {
        let (_dir, store) = temp_store();
        store.append(&[answer(1, "q1", "a1")]).await.unwrap();
        store
            .append(&[answer(2, "q2", "a2"), answer(3, "q3", "a3")])
            .await
            .unwrap();

        let all = store.read_all().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].answer, "a1");
        assert_eq!(all[1].answer, "a2");
        assert_eq!(all[2].answer, "a3");
    }

    #[tokio::test]
    async fn unparsable_content_is_a_decode_error_not_io() {
        let (_dir, store) = temp_store();
        tokio::fs::write(store.path(), "{ not json").await.unwrap();
        assert!(matches!(
            store.read_parsed().await,
            Err(StoreError::Decode(_))
        ));

        tokio::fs::remove_file(store.path()).await.unwrap();
        assert!(matches!(store.read_parsed().await, Err(StoreError::Io(_))));
    }

    #[tokio::test]
    async fn append_over_corrupt_file_starts_empty() {
        let (_dir, store) = temp_store();
        tokio::fs::write(store.path(), "{ not json").await.unwrap();

        store.append(&[answer(1, "q", "a")]).await.unwrap();
        let all = store.read_all().await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let (_dir, store) = temp_store();
        store.append(&[answer(1, "q", "a")]).await.unwrap();

        store.clear().await.unwrap();
        assert!(store.read_all().await.unwrap().is_empty());

        store.clear().await.unwrap();
        assert!(store.read_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_is_pretty_printed() {
        let (_dir, store) = temp_store();
        store.append(&[answer(1, "q", "a")]).await.unwrap();
        let content = tokio::fs::read_to_string(store.path()).await.unwrap();
        assert!(content.contains('\n'));
    }
}
