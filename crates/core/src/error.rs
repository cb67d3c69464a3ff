//! Error types for the Sleuth domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; [`RoundError`] groups the
//! failures a single planning round can hit.

use thiserror::Error;
use crate::event::RoundStage;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Tool execution failed: {tool_name}: {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Tool timed out: {tool_name} after {timeout_secs}s")]
    Timeout { tool_name: String, timeout_secs: u64 },

    #[error("Invalid tool input: {0}")]
    InvalidInput(String),

    #[error("Network error in {tool_name}: {reason}")]
    Network { tool_name: String, reason: String },
}

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Corrupted record: {0}")]
    Corrupted(String),
}

/// Failure to recover a research plan from model output.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Model output is empty")]
    Empty,

    #[error("Payload is not a valid research plan: {reason}")]
    Malformed { reason: String, payload: String },
}

/// Everything that can go wrong inside a single planning round.
///
/// None of these abort the loop. They are reported through logs and
/// [`crate::event::DomainEvent::RoundFailed`] and the round is skipped
/// (or, for tool failures, the failure text becomes the tool's result).
#[derive(Debug, Error)]
pub enum RoundError {
    #[error("Model call failed: {0}")]
    ModelCall(#[from] ProviderError),

    #[error("Could not extract a plan: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Tool '{tool}' failed: {source}")]
    ToolInvocation {
        tool: String,
        #[source]
        source: ToolError,
    },

    #[error("Unknown tool requested: {0}")]
    UnknownTool(String),
}

impl RoundError {
    /// The stage a round-skipping failure happened in.
    ///
    /// Tool failures and unknown tools do not skip the round, so they have none.
    pub fn stage(&self) -> Option<RoundStage> {
        match self {
            Self::ModelCall(_) => Some(RoundStage::ModelCall),
            Self::Extraction(_) => Some(RoundStage::Extraction),
            Self::ToolInvocation { .. } | Self::UnknownTool(_) => None,
        }
    }
}
