//! Conversation history backends for Sleuth.

pub mod file_backend;
pub mod in_memory;
pub mod noop;

pub use file_backend::FileHistory;
pub use in_memory::InMemoryHistory;
pub use noop::NoopHistory;

use sleuth_config::HistoryConfig;
use sleuth_core::memory::ConversationMemory;
use std::sync::Arc;

/// Build the history backend named by the config.
///
/// Unknown backend names fall back to in-memory; `AppConfig::validate`
/// rejects them before this is reached in normal use.
pub fn from_config(config: &HistoryConfig) -> Arc<dyn ConversationMemory> {
    match config.backend.as_str() {
        "file" => Arc::new(FileHistory::new(config.resolved_path())),
        "none" => Arc::new(NoopHistory),
        _ => Arc::new(InMemoryHistory::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleuth_core::memory::ExchangeRecord;

    #[tokio::test]
    async fn builds_each_backend() {
        let dir = tempfile::tempdir().unwrap();
        let file = from_config(&HistoryConfig {
            backend: "file".into(),
            path: Some(dir.path().join("h.jsonl")),
        });
        assert_eq!(file.name(), "file");

        let none = from_config(&HistoryConfig {
            backend: "none".into(),
            path: None,
        });
        none.append(ExchangeRecord::new("q", "s", vec![])).await.unwrap();
        assert_eq!(none.len().await.unwrap(), 0);

        assert_eq!(from_config(&HistoryConfig::default()).name(), "memory");
    }
}
