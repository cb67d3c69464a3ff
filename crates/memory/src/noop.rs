//! No-op history. Disables follow-up context entirely.

use async_trait::async_trait;
use sleuth_core::error::MemoryError;
use sleuth_core::memory::{ConversationMemory, ExchangeRecord};

/// A history that remembers nothing.
pub struct NoopHistory;

#[async_trait]
impl ConversationMemory for NoopHistory {
    fn name(&self) -> &str { "none" }

    async fn append(&self, _record: ExchangeRecord) -> Result<(), MemoryError> {
        Ok(())
    }

    async fn recent(&self, _n: usize) -> Result<Vec<ExchangeRecord>, MemoryError> {
        Ok(Vec::new())
    }

    async fn len(&self) -> Result<usize, MemoryError> {
        Ok(0)
    }

    async fn clear(&self) -> Result<(), MemoryError> {
        Ok(())
    }
}
