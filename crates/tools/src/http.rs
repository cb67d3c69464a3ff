//! Shared HTTP plumbing for the network-backed tools.

use sleuth_core::error::ToolError;
use std::time::Duration;

pub(crate) fn build_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("sleuth/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}

/// Map a transport or status failure into a [`ToolError`].
pub(crate) fn map_error(tool_name: &str, timeout_secs: u64, err: reqwest::Error) -> ToolError {
    if err.is_timeout() {
        ToolError::Timeout {
            tool_name: tool_name.to_string(),
            timeout_secs,
        }
    } else if let Some(status) = err.status() {
        ToolError::ExecutionFailed {
            tool_name: tool_name.to_string(),
            reason: format!("HTTP {status}"),
        }
    } else {
        ToolError::Network {
            tool_name: tool_name.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Reject blank input before going to the network.
pub(crate) fn require_query(input: &str) -> Result<&str, ToolError> {
    let query = input.trim();
    if query.is_empty() {
        return Err(ToolError::InvalidInput("Query is empty".into()));
    }
    Ok(query)
}
