//! File-based history: persistent JSON-lines storage.
//!
//! Each line is a JSON-encoded [`ExchangeRecord`]. Because the history is
//! append-only, a new exchange is written by appending one line; only
//! `clear` rewrites the file.
//!
//! Storage location: `~/.sleuth/history.jsonl` unless configured otherwise.

use async_trait::async_trait;
use sleuth_core::error::MemoryError;
use sleuth_core::memory::{ConversationMemory, ExchangeRecord, tail};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// A file-backed history using JSONL (one JSON object per line).
///
/// Records are loaded into memory on creation; reads never touch the disk.
pub struct FileHistory {
    path: PathBuf,
    records: Arc<RwLock<Vec<ExchangeRecord>>>,
}

impl FileHistory {
    /// Open the history at the given path.
    ///
    /// If the file exists, records are loaded from it.
    /// If it does not, starts empty (file created on first append).
    pub fn new(path: PathBuf) -> Self {
        let records = Self::load_from_disk(&path);
        debug!(path = %path.display(), count = records.len(), "File history loaded");
        Self {
            path,
            records: Arc::new(RwLock::new(records)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load records from a JSONL file, skipping lines that do not parse.
    fn load_from_disk(path: &Path) -> Vec<ExchangeRecord> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return Vec::new(),
        };

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(|line| match serde_json::from_str::<ExchangeRecord>(line) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(error = %e, "Skipping corrupted history line");
                    None
                }
            })
            .collect()
    }

    async fn ensure_parent(&self) -> Result<(), MemoryError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                MemoryError::Storage(format!("Failed to create history directory: {e}"))
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl ConversationMemory for FileHistory {
    fn name(&self) -> &str {
        "file"
    }

    async fn append(&self, record: ExchangeRecord) -> Result<(), MemoryError> {
        let mut line = serde_json::to_string(&record)
            .map_err(|e| MemoryError::Corrupted(format!("Failed to serialize record: {e}")))?;
        line.push('\n');

        // Hold the write lock across the disk write so lines never interleave
        let mut records = self.records.write().await;
        self.ensure_parent().await?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| MemoryError::Storage(format!("Failed to open history file: {e}")))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| MemoryError::Storage(format!("Failed to write history file: {e}")))?;
        file.flush()
            .await
            .map_err(|e| MemoryError::Storage(format!("Failed to flush history file: {e}")))?;

        records.push(record);
        Ok(())
    }

    async fn recent(&self, n: usize) -> Result<Vec<ExchangeRecord>, MemoryError> {
        Ok(tail(&self.records.read().await, n))
    }

    async fn len(&self) -> Result<usize, MemoryError> {
        Ok(self.records.read().await.len())
    }

    async fn clear(&self) -> Result<(), MemoryError> {
        let mut records = self.records.write().await;
        self.ensure_parent().await?;
        tokio::fs::write(&self.path, b"")
            .await
            .map_err(|e| MemoryError::Storage(format!("Failed to truncate history file: {e}")))?;
        records.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn record(query: &str) -> ExchangeRecord {
        ExchangeRecord::new(query, format!("Summary of {query}"), vec!["src".into()])
    }

    #[tokio::test]
    async fn append_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");

        let history = FileHistory::new(path.clone());
        history.append(record("rust ownership")).await.unwrap();
        history.append(record("tokio runtime")).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("rust ownership"));

        let reopened = FileHistory::new(path);
        let recent = reopened.recent(3).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].query, "rust ownership");
        assert_eq!(recent[1].sources, vec!["src".to_string()]);
    }

    #[tokio::test]
    async fn append_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.jsonl");

        let history = FileHistory::new(path.clone());
        history.append(record("q")).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn clear_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.jsonl");

        let history = FileHistory::new(path.clone());
        history.append(record("one")).await.unwrap();
        history.append(record("two")).await.unwrap();
        history.clear().await.unwrap();
        assert_eq!(history.len().await.unwrap(), 0);

        let reopened = FileHistory::new(path);
        assert_eq!(reopened.len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn handles_missing_file_gracefully() {
        let dir = tempfile::tempdir().unwrap();
        let history = FileHistory::new(dir.path().join("absent.jsonl"));
        assert_eq!(history.len().await.unwrap(), 0);
        assert!(history.recent(3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn handles_corrupted_lines() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, r#"{{"query":"a","summary":"first","sources":[],"recorded_at":"2026-01-01T00:00:00Z"}}"#).unwrap();
        writeln!(tmp, "this is not json").unwrap();
        writeln!(tmp, r#"{{"query":"b","summary":"second","recorded_at":"2026-01-02T00:00:00Z"}}"#).unwrap();

        let history = FileHistory::new(tmp.path().to_path_buf());
        assert_eq!(history.len().await.unwrap(), 2);
        let recent = history.recent(5).await.unwrap();
        assert_eq!(recent[1].summary, "second");
    }
}
