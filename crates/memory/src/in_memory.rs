//! In-memory history. Lives as long as the agent does.

use async_trait::async_trait;
use sleuth_core::error::MemoryError;
use sleuth_core::memory::{ConversationMemory, ExchangeRecord, tail};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A history that stores exchanges in a Vec.
pub struct InMemoryHistory {
    records: Arc<RwLock<Vec<ExchangeRecord>>>,
}

impl InMemoryHistory {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationMemory for InMemoryHistory {
    fn name(&self) -> &str { "memory" }

    async fn append(&self, record: ExchangeRecord) -> Result<(), MemoryError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn recent(&self, n: usize) -> Result<Vec<ExchangeRecord>, MemoryError> {
        Ok(tail(&self.records.read().await, n))
    }

    async fn len(&self) -> Result<usize, MemoryError> {
        Ok(self.records.read().await.len())
    }

    async fn clear(&self) -> Result<(), MemoryError> {
        self.records.write().await.clear();
        Ok(())
    }
}
