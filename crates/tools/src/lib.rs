//! Built-in tool implementations for Sleuth.
//!
//! Tools give the research agent a way to reach outside the model:
//! search the web, look a topic up in the encyclopedia, and append notes
//! to a file. Callers can add their own with [`FnTool`] or any
//! [`sleuth_core::tool::Tool`] impl.

mod http;

pub mod function;
pub mod save;
pub mod web_search;
pub mod wiki;

pub use function::FnTool;
pub use save::SaveTool;
pub use web_search::SearchTool;
pub use wiki::WikiTool;

use sleuth_config::ToolsConfig;
use sleuth_core::tool::ToolRegistry;
use std::sync::Arc;

/// Create a registry holding `search_tool`, `wiki_tool` and `save_tool`.
pub fn default_registry(config: &ToolsConfig) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register_tool(Arc::new(SearchTool::from_config(config)));
    registry.register_tool(Arc::new(WikiTool::from_config(config)));
    registry.register_tool(Arc::new(SaveTool::from_config(config)));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_names() {
        let registry = default_registry(&ToolsConfig::default());
        let names: Vec<_> = registry.names().into_iter().collect();
        assert_eq!(names, vec!["save_tool", "search_tool", "wiki_tool"]);
    }
}
