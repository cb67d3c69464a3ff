//! Per-call research state.

use sleuth_core::research::{ResearchOutcome, ResearchResult};
use std::collections::BTreeMap;

/// The mutable record of one research call.
///
/// Every name in `tools_used` has exactly one entry in `tool_results` and
/// vice versa; a tool can only be recorded once per session.
#[derive(Debug, Clone)]
pub struct SessionState {
    topic: String,
    tools_used: Vec<String>,
    tool_results: BTreeMap<String, String>,
    summary: String,
    sources: Vec<String>,
}

impl SessionState {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            tools_used: Vec::new(),
            tool_results: BTreeMap::new(),
            summary: String::new(),
            sources: Vec::new(),
        }
    }

    /// Record a tool's output. Returns `false` (and changes nothing) if the
    /// tool was already recorded this session.
    pub fn record_tool_result(&mut self, name: impl Into<String>, text: impl Into<String>) -> bool {
        let name = name.into();
        if self.tool_results.contains_key(&name) {
            return false;
        }
        self.tools_used.push(name.clone());
        self.tool_results.insert(name, text.into());
        true
    }

    /// Overwrite the draft answer.
    pub fn apply_plan(&mut self, summary: String, sources: Vec<String>) {
        self.summary = summary;
        self.sources = sources;
    }

    pub fn has_used(&self, name: &str) -> bool {
        self.tool_results.contains_key(name)
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Tool names in invocation order.
    pub fn tools_used(&self) -> &[String] {
        &self.tools_used
    }

    pub fn tool_results(&self) -> &BTreeMap<String, String> {
        &self.tool_results
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Tool results as pretty-printed JSON, for the prompt.
    pub fn tool_results_json(&self) -> String {
        serde_json::to_string_pretty(&self.tool_results).unwrap_or_else(|_| "{}".into())
    }

    /// Finalize into a result. An empty summary is replaced by `fallback_summary`.
    pub fn into_result(
        self,
        iterations: u32,
        outcome: ResearchOutcome,
        fallback_summary: &str,
    ) -> ResearchResult {
        let summary = if self.summary.is_empty() {
            fallback_summary.to_string()
        } else {
            self.summary
        };

        ResearchResult {
            topic: self.topic,
            summary,
            sources: self.sources,
            tools_used: self.tools_used,
            iterations,
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tools_recorded_once_in_order() {
        let mut state = SessionState::new("rust");
        assert!(state.record_tool_result("wiki_tool", "Wikipedia: ..."));
        assert!(state.record_tool_result("search_tool", "DuckDuckGo Search Results: ..."));
        assert!(!state.record_tool_result("wiki_tool", "second call"));

        assert_eq!(state.tools_used(), ["wiki_tool", "search_tool"]);
        assert_eq!(state.tool_results().len(), 2);
        assert_eq!(state.tool_results()["wiki_tool"], "Wikipedia: ...");
        assert!(state.has_used("search_tool"));
        assert!(!state.has_used("save_tool"));
    }

    #[test]
    fn apply_plan_overwrites() {
        let mut state = SessionState::new("rust");
        state.apply_plan("first".into(), vec!["a".into()]);
        state.apply_plan(String::new(), vec![]);
        assert_eq!(state.summary(), "");
        assert!(state.sources().is_empty());
    }

    #[test]
    fn results_json_is_an_object() {
        let mut state = SessionState::new("rust");
        assert_eq!(state.tool_results_json(), "{}");

        state.record_tool_result("wiki_tool", "text");
        let parsed: serde_json::Value = serde_json::from_str(&state.tool_results_json()).unwrap();
        assert_eq!(parsed["wiki_tool"], "text");
    }

    #[test]
    fn into_result_uses_fallback_for_empty_summary() {
        let mut state = SessionState::new("rust");
        state.record_tool_result("search_tool", "x");
        let result = state.into_result(5, ResearchOutcome::Exhausted, "Unable to complete research");

        assert_eq!(result.topic, "rust");
        assert_eq!(result.summary, "Unable to complete research");
        assert_eq!(result.tools_used, vec!["search_tool".to_string()]);
        assert_eq!(result.iterations, 5);
        assert!(!result.converged());
    }

    #[test]
    fn into_result_keeps_summary() {
        let mut state = SessionState::new("rust");
        state.apply_plan("Rust is a language".into(), vec!["rust-lang.org".into()]);
        let result = state.into_result(2, ResearchOutcome::Converged, "fallback");
        assert_eq!(result.summary, "Rust is a language");
        assert_eq!(result.sources, vec!["rust-lang.org".to_string()]);
    }
}
