//! Domain events published by the planning loop.
//!
//! The loop publishes an event whenever something interesting happens in
//! a research session. Subscribers (the CLI's progress printer, tests)
//! react without being coupled to the loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use crate::research::ResearchOutcome;

/// Where inside a round a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStage {
    ModelCall,
    Extraction,
}

/// All domain events in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DomainEvent {
    /// A research call started
    ResearchStarted {
        session_id: String,
        query: String,
        max_iterations: u32,
        timestamp: DateTime<Utc>,
    },

    /// A planning round started
    RoundStarted {
        session_id: String,
        iteration: u32,
        timestamp: DateTime<Utc>,
    },

    /// A round was skipped because the model call or extraction failed
    RoundFailed {
        session_id: String,
        iteration: u32,
        stage: RoundStage,
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// The model answered; `tokens_used` is 0 when the provider reports no usage
    ResponseGenerated {
        session_id: String,
        model: String,
        tokens_used: u32,
        timestamp: DateTime<Utc>,
    },

    /// A tool was executed
    ToolExecuted {
        session_id: String,
        tool_name: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// The model asked for a tool that is not registered
    UnknownToolRequested {
        session_id: String,
        tool_name: String,
        timestamp: DateTime<Utc>,
    },

    /// A research call finished
    ResearchCompleted {
        session_id: String,
        outcome: ResearchOutcome,
        iterations: u32,
        tools_used: Vec<String>,
        timestamp: DateTime<Utc>,
    },
}

/// A broadcast-based event bus for domain events.
///
/// Uses `tokio::sync::broadcast` for multi-consumer pub/sub.
pub struct EventBus {
    sender: broadcast::Sender<Arc<DomainEvent>>,
}

impl EventBus {
    /// Create a new event bus with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: DomainEvent) {
        // No subscribers is fine
        let _ = self.sender.send(Arc::new(event));
    }

    /// Subscribe to receive events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<DomainEvent>> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
