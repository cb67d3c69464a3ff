//! Prompt assembly for one planning round.

use crate::session::SessionState;
use sleuth_core::memory::ExchangeRecord;
use std::collections::BTreeSet;

/// Output format the model is asked to follow, sent verbatim every round.
pub const FORMAT_INSTRUCTIONS: &str = r#"Respond with a single JSON object that conforms to this JSON schema:

{"type": "object", "properties": {"summary": {"type": "string", "description": "Detailed findings so far"}, "sources": {"type": "array", "items": {"type": "string"}, "description": "Sources consulted"}, "tools_used": {"type": "array", "items": {"type": "string"}, "description": "Tools to call now; leave empty when the summary is final"}}, "required": ["summary", "sources", "tools_used"]}

Do not add any other keys. Wrapping the object in a ```json code block is allowed."#;

/// Everything that goes into one round's prompt.
pub struct PromptInput<'a> {
    pub session: &'a SessionState,
    pub history: &'a [ExchangeRecord],
    pub available_tools: &'a BTreeSet<String>,
    pub min_tools: usize,
    pub summary_preview_chars: usize,
}

fn json_list<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    let items: Vec<&String> = items.into_iter().collect();
    serde_json::to_string(&items).unwrap_or_else(|_| "[]".into())
}

/// Past exchanges, oldest first, or an empty string when there are none.
fn history_block(history: &[ExchangeRecord], preview_chars: usize) -> String {
    if history.is_empty() {
        return String::new();
    }

    let mut ctx = String::from("\n\nPrevious conversation:\n");
    for (i, record) in history.iter().enumerate() {
        ctx.push_str(&format!(
            "\nQuery {}: {}\nAnswer: {}...\n",
            i + 1,
            record.query,
            record.summary_preview(preview_chars)
        ));
    }
    ctx
}

/// Render the prompt for the next round.
pub fn build_prompt(input: &PromptInput<'_>) -> String {
    let session = input.session;
    format!(
        "\nUser query: {query}\n{history}\n\n\
         Tools already used: {used}\n\
         Previous results: {results}\n\n\
         Available tools: {available}\n\n\
         IMPORTANT INSTRUCTIONS:\n\
         1. If this is a follow-up question (like \"show me an example\"), use context from the previous conversation\n\
         2. Call multiple tools in ONE iteration (e.g., [\"search_tool\", \"wiki_tool\"])\n\
         3. ALWAYS include specific sources in your \"sources\" list\n\
         4. After calling {min_tools}+ tools, immediately provide the final summary\n\
         5. Be efficient: aim to complete in 2-3 iterations\n\n\
         Return JSON with:\n\
         - \"summary\": detailed findings summary (required after tools are called)\n\
         - \"sources\": list of sources consulted (required, extract from tool results)\n\
         - \"tools_used\": list of NEW tools to call NOW (can be multiple at once)\n\n\
         {format}\n",
        query = session.topic(),
        history = history_block(input.history, input.summary_preview_chars),
        used = json_list(session.tools_used()),
        results = session.tool_results_json(),
        available = json_list(input.available_tools),
        min_tools = input.min_tools,
        format = FORMAT_INSTRUCTIONS,
    )
}
