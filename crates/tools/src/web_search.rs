//! Web search tool backed by the DuckDuckGo Instant Answer API.
//!
//! The endpoint returns an abstract for well-known topics plus a list of
//! related topics. Both are flattened into a single block of text for the
//! model to read.

use crate::http::{build_client, map_error, require_query};
use async_trait::async_trait;
use serde::Deserialize;
use sleuth_config::ToolsConfig;
use sleuth_core::error::ToolError;
use sleuth_core::tool::Tool;
use tracing::debug;

const NAME: &str = "search_tool";
const MAX_RELATED: usize = 5;

pub struct SearchTool {
    endpoint: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl SearchTool {
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout_secs,
            client: build_client(timeout_secs),
        }
    }

    pub fn from_config(config: &ToolsConfig) -> Self {
        Self::new(&config.search_url, config.timeout_secs)
    }
}

#[derive(Debug, Deserialize)]
struct InstantAnswer {
    #[serde(rename = "Heading", default)]
    heading: String,
    #[serde(rename = "AbstractText", default)]
    abstract_text: String,
    #[serde(rename = "AbstractURL", default)]
    abstract_url: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<RelatedTopic>,
}

/// Either a single topic or a named group of topics.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RelatedTopic {
    Topic {
        #[serde(rename = "Text")]
        text: String,
        #[serde(rename = "FirstURL", default)]
        first_url: String,
    },
    Group {
        #[serde(rename = "Topics")]
        topics: Vec<RelatedTopic>,
    },
}

impl RelatedTopic {
    fn flatten<'a>(&'a self, out: &mut Vec<(&'a str, &'a str)>) {
        match self {
            RelatedTopic::Topic { text, first_url } => out.push((text, first_url)),
            RelatedTopic::Group { topics } => topics.iter().for_each(|t| t.flatten(out)),
        }
    }
}

fn render(answer: &InstantAnswer) -> String {
    let mut parts = Vec::new();

    if !answer.abstract_text.is_empty() {
        let mut line = String::new();
        if !answer.heading.is_empty() {
            line.push_str(&answer.heading);
            line.push_str(": ");
        }
        line.push_str(&answer.abstract_text);
        if !answer.abstract_url.is_empty() {
            line.push_str(&format!(" ({})", answer.abstract_url));
        }
        parts.push(line);
    }

    let mut related = Vec::new();
    for topic in &answer.related_topics {
        topic.flatten(&mut related);
    }
    for (text, url) in related.into_iter().filter(|(t, _)| !t.is_empty()).take(MAX_RELATED) {
        if url.is_empty() {
            parts.push(text.to_string());
        } else {
            parts.push(format!("{text} ({url})"));
        }
    }

    if parts.is_empty() {
        "No good DuckDuckGo Search Result was found".into()
    } else {
        parts.join("\n")
    }
}

#[async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Search DuckDuckGo for information online."
    }

    async fn run(&self, input: &str) -> Result<String, ToolError> {
        let query = require_query(input)?;
        debug!(tool = NAME, query, "Searching");

        let answer: InstantAnswer = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("format", "json"), ("no_html", "1"), ("skip_disambig", "1")])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| map_error(NAME, self.timeout_secs, e))?
            .json()
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: NAME.into(),
                reason: format!("Unexpected response: {e}"),
            })?;

        Ok(format!("DuckDuckGo Search Results: {}", render(&answer)))
    }
}
