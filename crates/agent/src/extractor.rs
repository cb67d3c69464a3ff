//! Response extractor: recover the JSON plan from free-form model text.
//!
//! Models wrap their answer in prose, code fences, or both. Extraction is
//! an ordered chain of matchers, first hit wins:
//!
//! 1. The first fenced code block (optionally labelled `json`) whose body
//!    is a brace-delimited span. The body is returned.
//! 2. The widest brace-delimited span, first `{` to last `}`.
//! 3. The raw text unchanged.
//!
//! Brace matching is a greedy heuristic, not a well-formedness check. The
//! JSON parse that follows is what decides whether the round is usable.

use regex_lite::Regex;
use serde::{Deserialize, Deserializer};
use sleuth_core::error::ExtractionError;
use std::sync::LazyLock;

static FENCED_BLOCK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").ok());

static BRACE_SPAN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").ok());

type Matcher = fn(&str) -> Option<&str>;

const MATCHERS: &[Matcher] = &[fenced_block, brace_span];

fn fenced_block(text: &str) -> Option<&str> {
    let caps = FENCED_BLOCK.as_ref()?.captures(text)?;
    caps.get(1).map(|m| m.as_str())
}

fn brace_span(text: &str) -> Option<&str> {
    BRACE_SPAN.as_ref()?.find(text).map(|m| m.as_str())
}

/// Pull the most likely JSON payload out of `raw`.
pub fn extract(raw: &str) -> &str {
    MATCHERS.iter().find_map(|m| m(raw)).unwrap_or(raw)
}

/// One round's plan as the model reported it.
///
/// Every field is optional: a missing `summary` or `sources` means "keep
/// what we had", a missing or null `tools_used` means no tools requested.
/// Entries of `tools_used` that are not strings are dropped.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub sources: Option<Vec<String>>,
    #[serde(default, deserialize_with = "tool_names")]
    pub tools_used: Option<Vec<String>>,
}

fn tool_names<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(entries.map(|entries| {
        entries
            .into_iter()
            .filter_map(|entry| match entry {
                serde_json::Value::String(name) => Some(name),
                _ => None,
            })
            .collect()
    }))
}

impl Plan {
    /// Tools requested this round, in the order the model listed them.
    pub fn requested_tools(&self) -> &[String] {
        self.tools_used.as_deref().unwrap_or_default()
    }
}

/// Extract and parse a [`Plan`] from raw model output.
pub fn parse_plan(raw: &str) -> Result<Plan, ExtractionError> {
    if raw.trim().is_empty() {
        return Err(ExtractionError::Empty);
    }

    let payload = extract(raw);
    let malformed = |reason: String| ExtractionError::Malformed {
        reason,
        payload: payload.to_string(),
    };

    let value: serde_json::Value =
        serde_json::from_str(payload).map_err(|e| malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(malformed("expected a JSON object".into()));
    }
    serde_json::from_value(value).map_err(|e| malformed(e.to_string()))
}
