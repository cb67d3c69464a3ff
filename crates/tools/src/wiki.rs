//! Encyclopedia lookup tool backed by the MediaWiki API.
//!
//! One request does both the search and the summary fetch: the search is
//! used as a page generator and the intro extract of each hit is returned.

use crate::http::{build_client, map_error, require_query};
use async_trait::async_trait;
use serde::Deserialize;
use sleuth_config::ToolsConfig;
use sleuth_core::error::ToolError;
use sleuth_core::tool::Tool;
use std::collections::HashMap;
use tracing::debug;

const NAME: &str = "wiki_tool";

pub struct WikiTool {
    endpoint: String,
    max_results: usize,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl WikiTool {
    pub fn new(endpoint: impl Into<String>, max_results: usize, timeout_secs: u64) -> Self {
        Self {
            endpoint: endpoint.into(),
            max_results: max_results.max(1),
            timeout_secs,
            client: build_client(timeout_secs),
        }
    }

    pub fn from_config(config: &ToolsConfig) -> Self {
        Self::new(&config.wiki_url, config.wiki_results, config.timeout_secs)
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    query: Option<QueryPages>,
}

#[derive(Debug, Deserialize)]
struct QueryPages {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    /// Rank in the search results.
    #[serde(default)]
    index: u32,
    #[serde(default)]
    extract: String,
}

fn render(response: QueryResponse) -> String {
    let mut pages: Vec<Page> = response
        .query
        .map(|q| q.pages.into_values().collect())
        .unwrap_or_default();
    pages.sort_by_key(|p| p.index);

    let sections: Vec<String> = pages
        .into_iter()
        .filter(|p| !p.extract.trim().is_empty())
        .map(|p| format!("Page: {}\nSummary: {}", p.title, p.extract.trim()))
        .collect();

    if sections.is_empty() {
        "No good Wikipedia Search Result was found".into()
    } else {
        sections.join("\n\n")
    }
}

#[async_trait]
impl Tool for WikiTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Fetch relevant Wikipedia information."
    }

    async fn run(&self, input: &str) -> Result<String, ToolError> {
        let query = require_query(input)?;
        let limit = self.max_results.to_string();
        debug!(tool = NAME, query, limit = self.max_results, "Looking up");

        let response: QueryResponse = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("generator", "search"),
                ("gsrsearch", query),
                ("gsrlimit", limit.as_str()),
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("exlimit", "max"),
            ])
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

        Ok(format!("Wikipedia: {}", render(response)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn lookup_orders_pages_by_rank() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("gsrsearch", "borrow checker"))
            .and(query_param("gsrlimit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "query": { "pages": {
                    "200": { "title": "Ownership", "index": 2, "extract": "Ownership is..." },
                    "100": { "title": "Rust (programming language)", "index": 1, "extract": "Rust is..." }
                }}
            })))
            .mount(&server)
            .await;

        let tool = WikiTool::new(server.uri(), 2, 5);
        let out = tool.run("borrow checker").await.unwrap();

        assert_eq!(
            out,
            "Wikipedia: Page: Rust (programming language)\nSummary: Rust is...\n\n\
             Page: Ownership\nSummary: Ownership is..."
        );
    }

    #[tokio::test]
    async fn no_hits_reports_no_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "batchcomplete": ""
            })))
            .mount(&server)
            .await;

        let out = WikiTool::new(server.uri(), 3, 5).run("qwxz").await.unwrap();
        assert_eq!(out, "Wikipedia: No good Wikipedia Search Result was found");
    }

    #[tokio::test]
    async fn malformed_body_is_execution_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = WikiTool::new(server.uri(), 3, 5).run("rust").await.unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
    }

    #[test]
    fn tool_metadata() {
        let tool = WikiTool::from_config(&ToolsConfig::default());
        assert_eq!(tool.name(), "wiki_tool");
        assert_eq!(tool.max_results, 3);
    }
}
