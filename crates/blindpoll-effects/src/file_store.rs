//! File-backed poll store
//!
//! Keeps the whole store tree as one JSON document on disk. Batches are
//! applied by rewriting the document to a sibling temp file and renaming it
//! over the original, so readers see either the old or the new tree.

use async_trait::async_trait;
use blindpoll_core::document;
use blindpoll_core::{PollError, PollId, PollResult, PollSnapshot, PollStoreEffects, UpdateBatch};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

/// JSON document store rooted at a single file.
#[derive(Debug)]
pub struct FileDocumentStore {
    /// Document location
    path: PathBuf,
    /// Poll served by `fetch_current_poll`
    poll: PollId,
    /// Serializes read-modify-write cycles from this process
    write_lock: Mutex<()>,
}

impl FileDocumentStore {
    /// Store reading poll `poll` from the document at `path`.
    pub fn new(path: impl Into<PathBuf>, poll: PollId) -> Self {
        Self {
            path: path.into(),
            poll,
            write_lock: Mutex::new(()),
        }
    }

    /// Document location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `snapshot` as this store's poll into a fresh document.
    ///
    /// Fails if the file exists unless `overwrite` is set, or if the poll id
    /// is above [`PollId::MAX`].
    pub async fn initialize(&self, snapshot: &PollSnapshot, overwrite: bool) -> PollResult<()> {
        let poll = self.poll.check_bounds()?;

        let _guard = self.write_lock.lock().await;
        if !overwrite && fs::try_exists(&self.path).await? {
            return Err(PollError::invalid(format!(
                "{} already exists",
                self.path.display()
            )));
        }

        let mut doc = document::empty_document();
        let polls: Vec<Value> = vec![Value::Null; poll.0 as usize + 1];
        doc["polls"] = Value::Array(polls);
        document::write_snapshot(&mut doc, self.poll, snapshot)?;
        self.write_document(&doc).await?;

        tracing::info!(
            path = %self.path.display(),
            poll = %self.poll,
            items = snapshot.items.len(),
            keys = snapshot.keys.len(),
            "initialized poll document"
        );
        Ok(())
    }

    async fn read_document(&self) -> PollResult<Value> {
        let contents = fs::read_to_string(&self.path).await.map_err(|e| {
            PollError::storage(format!("Failed to read {}: {e}", self.path.display()))
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    async fn write_document(&self, doc: &Value) -> PollResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                PollError::storage(format!("Failed to create directory: {e}"))
            })?;
        }

        let contents = serde_json::to_string_pretty(doc)?;
        let staging = self.staging_path();
        fs::write(&staging, contents)
            .await
            .map_err(|e| PollError::storage(format!("Failed to write file: {e}")))?;
        fs::rename(&staging, &self.path)
            .await
            .map_err(|e| PollError::storage(format!("Failed to replace document: {e}")))?;
        Ok(())
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl PollStoreEffects for FileDocumentStore {
    fn poll(&self) -> PollId {
        self.poll
    }

    async fn fetch_current_poll(&self) -> PollResult<PollSnapshot> {
        let doc = self.read_document().await?;
        let snapshot = document::read_snapshot(&doc, self.poll)?;
        tracing::debug!(poll = %self.poll, items = snapshot.items.len(), "fetched poll snapshot");
        Ok(snapshot)
    }

    async fn apply_update(&self, batch: &UpdateBatch) -> PollResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read_document().await?;
        document::apply_batch(&mut doc, batch)?;
        self.write_document(&doc).await?;
        tracing::debug!(writes = batch.len(), "applied update batch");
        Ok(())
    }
}
