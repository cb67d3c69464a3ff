//! Shared test helpers for planning-loop tests.

use async_trait::async_trait;
use sleuth_core::error::{ProviderError, ToolError};
use sleuth_core::message::Message;
use sleuth_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use sleuth_core::tool::Tool;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A mock provider that returns a sequence of scripted responses.
///
/// Each call to `complete` returns the next entry in the queue. Once the
/// script runs out every further call fails with an API error, which the
/// loop treats like any other failed model call.
pub struct SequentialMockProvider {
    script: Mutex<VecDeque<Result<ProviderResponse, ProviderError>>>,
    prompts: Mutex<Vec<String>>,
}

impl SequentialMockProvider {
    pub fn new(script: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A provider that answers with each text in turn.
    pub fn texts<S: Into<String>>(texts: impl IntoIterator<Item = S>) -> Self {
        Self::new(
            texts
                .into_iter()
                .map(|t| {
                    let text: String = t.into();
                    Ok(make_text_response(&text))
                })
                .collect(),
        )
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Every prompt received so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "sequential_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let prompt = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.prompts.lock().unwrap().push(prompt);

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ProviderError::ApiError {
                    status_code: 500,
                    message: "no more scripted responses".into(),
                })
            })
    }
}

/// Create a plain text response.
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
    }
}

/// A JSON plan the way a model would write it.
pub fn plan(summary: &str, sources: &[&str], tools: &[&str]) -> String {
    serde_json::json!({
        "summary": summary,
        "sources": sources,
        "tools_used": tools,
    })
    .to_string()
}

/// A tool that records every input and answers with a fixed prefix.
pub struct RecordingTool {
    name: String,
    inputs: Mutex<Vec<String>>,
}

impl RecordingTool {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Tool for RecordingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Records its inputs"
    }

    async fn run(&self, input: &str) -> Result<String, ToolError> {
        self.inputs.lock().unwrap().push(input.to_string());
        Ok(format!("{} result for {input}", self.name))
    }
}

/// A tool that always fails and counts how often it was tried.
pub struct FailingTool {
    calls: Mutex<usize>,
}

impl FailingTool {
    pub fn new() -> Self {
        Self { calls: Mutex::new(0) }
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        "failing_tool"
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    async fn run(&self, _input: &str) -> Result<String, ToolError> {
        *self.calls.lock().unwrap() += 1;
        Err(ToolError::Network {
            tool_name: "failing_tool".into(),
            reason: "connection refused".into(),
        })
    }
}
