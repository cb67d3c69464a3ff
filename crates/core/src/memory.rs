//! Conversation memory: the log of past research exchanges.
//!
//! Every finished research call appends one [`ExchangeRecord`]. The log
//! grows without bound; the planning loop only ever reads the most recent
//! few records (via [`ConversationMemory::recent`]) to give follow-up
//! questions some context.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::error::MemoryError;

/// One finished query/answer pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRecord {
    /// The research query as the caller asked it
    pub query: String,

    /// The final summary returned for that query
    pub summary: String,

    /// Sources cited in that summary
    #[serde(default)]
    pub sources: Vec<String>,

    /// When the exchange finished
    pub recorded_at: DateTime<Utc>,
}

impl ExchangeRecord {
    pub fn new(query: impl Into<String>, summary: impl Into<String>, sources: Vec<String>) -> Self {
        Self {
            query: query.into(),
            summary: summary.into(),
            sources,
            recorded_at: Utc::now(),
        }
    }

    /// The summary cut to at most `max_chars` characters.
    pub fn summary_preview(&self, max_chars: usize) -> &str {
        match self.summary.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.summary[..idx],
            None => &self.summary,
        }
    }
}

/// An append-only store of [`ExchangeRecord`]s.
#[async_trait]
pub trait ConversationMemory: Send + Sync {
    /// Backend name (e.g., "memory", "file", "none").
    fn name(&self) -> &str;

    /// Append a record.
    async fn append(&self, record: ExchangeRecord) -> Result<(), MemoryError>;

    /// The last `n` records, oldest first. Returns fewer if fewer exist.
    async fn recent(&self, n: usize) -> Result<Vec<ExchangeRecord>, MemoryError>;

    /// Number of stored records.
    async fn len(&self) -> Result<usize, MemoryError>;

    /// Remove all records.
    async fn clear(&self) -> Result<(), MemoryError>;
}

/// Take the tail of `records` as [`ConversationMemory::recent`] defines it.
pub fn tail(records: &[ExchangeRecord], n: usize) -> Vec<ExchangeRecord> {
    let start = records.len().saturating_sub(n);
    records[start..].to_vec()
}
