//! Research result types.

use serde::{Deserialize, Serialize};

/// How a research call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchOutcome {
    /// The model produced a summary without requesting further tools,
    /// after enough distinct tools had been used.
    Converged,
    /// The iteration cap was reached first; the result is a best guess.
    Exhausted,
    /// Stopped by the caller. Reserved: the planning loop never produces it.
    Aborted,
}

impl std::fmt::Display for ResearchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Converged => "converged",
            Self::Exhausted => "exhausted",
            Self::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// The finalized output of one research call.
///
/// `topic`, `summary`, `sources` and `tools_used` are always present
/// (lists may be empty). `iterations` and `outcome` are extra metadata so
/// callers can tell a converged answer from one cut off by the iteration cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchResult {
    pub topic: String,
    pub summary: String,
    pub sources: Vec<String>,
    pub tools_used: Vec<String>,
    pub iterations: u32,
    pub outcome: ResearchOutcome,
}

impl ResearchResult {
    pub fn converged(&self) -> bool {
        self.outcome == ResearchOutcome::Converged
    }

    /// Plain-text rendering used when saving results to disk.
    pub fn to_plain_text(&self) -> String {
        format!(
            "Topic: {}\n\nSummary:\n{}\n\nSources: {}\nTools Used: {}\n",
            self.topic,
            self.summary,
            self.sources.join(", "),
            self.tools_used.join(", "),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ResearchResult {
        ResearchResult {
            topic: "CALCULATETABLE DAX".into(),
            summary: "Modifies filter context and returns a table.".into(),
            sources: vec!["learn.microsoft.com".into(), "sqlbi.com".into()],
            tools_used: vec!["search_tool".into(), "wiki_tool".into()],
            iterations: 2,
            outcome: ResearchOutcome::Converged,
        }
    }

    #[test]
    fn plain_text_has_all_fields() {
        let text = sample().to_plain_text();
        assert_eq!(
            text,
            "Topic: CALCULATETABLE DAX\n\n\
             Summary:\nModifies filter context and returns a table.\n\n\
             Sources: learn.microsoft.com, sqlbi.com\n\
             Tools Used: search_tool, wiki_tool\n"
        );
    }

    #[test]
    fn plain_text_with_empty_lists() {
        let result = ResearchResult {
            sources: vec![],
            tools_used: vec![],
            ..sample()
        };
        let text = result.to_plain_text();
        assert!(text.contains("Sources: \n"));
        assert!(text.ends_with("Tools Used: \n"));
    }

    #[test]
    fn outcome_serializes_snake_case() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(json.contains(r#""outcome":"converged""#));
        assert!(sample().converged());
        assert_eq!(ResearchOutcome::Exhausted.to_string(), "exhausted");
    }
}
