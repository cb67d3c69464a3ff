//! Tool trait: the abstraction over research capabilities.
//!
//! Tools are what let the agent reach outside the model: search the web,
//! look something up in an encyclopedia, append notes to a file. Every
//! tool has the same contract: take the research query as text, return
//! text, or fail.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use crate::error::ToolError;

/// The core Tool trait.
///
/// Each capability (search, wiki lookup, save, caller-supplied closures)
/// implements this trait and is made available to the planning loop
/// through the [`ToolRegistry`].
#[async_trait]
pub trait Tool: Send + Sync {
    /// The default registration name of this tool (e.g., "search_tool").
    fn name(&self) -> &str;

    /// A description of what this tool does.
    fn description(&self) -> &str;

    /// Run the tool against the given input text.
    async fn run(&self, input: &str) -> std::result::Result<String, ToolError>;
}

/// A registry of available tools, keyed by name.
///
/// The name a tool is registered under is what the model sees and
/// requests; it does not have to match [`Tool::name`]. The registry does
/// not sandbox or rate-limit the tools it holds.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool under `name`. Replaces any existing tool with the same name.
    pub fn register(&mut self, name: impl Into<String>, tool: Arc<dyn Tool>) {
        self.tools.insert(name.into(), tool);
    }

    /// Register a tool under its own [`Tool::name`].
    pub fn register_tool(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        self.register(name, tool);
    }

    /// Remove a tool. Unknown names are ignored.
    pub fn unregister(&mut self, name: &str) {
        self.tools.remove(name);
    }

    /// Look up a tool by name.
    pub fn resolve(&self, name: &str) -> std::result::Result<Arc<dyn Tool>, ToolError> {
        self.tools
            .get(name)
            .cloned()
            .ok_or_else(|| ToolError::NotFound(name.to_string()))
    }

    /// Snapshot of all registered tool names, sorted.
    pub fn names(&self) -> BTreeSet<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple test tool for unit tests.
    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str { "echo" }
        fn description(&self) -> &str { "Echoes back the input" }
        async fn run(&self, input: &str) -> std::result::Result<String, ToolError> {
            Ok(input.to_string())
        }
    }

    struct ShoutTool;

    #[async_trait]
    impl Tool for ShoutTool {
        fn name(&self) -> &str { "shout" }
        fn description(&self) -> &str { "Upper-cases the input" }
        async fn run(&self, input: &str) -> std::result::Result<String, ToolError> {
            Ok(input.to_uppercase())
        }
    }

    #[test]
    fn registry_register_and_resolve() {
        let mut registry = ToolRegistry::new();
        registry.register_tool(Arc::new(EchoTool));
        assert!(registry.resolve("echo").is_ok());
        assert!(matches!(
            registry.resolve("nonexistent"),
            Err(ToolError::NotFound(name)) if name == "nonexistent"
        ));
    }

    #[test]
    fn register_under_custom_name() {
        let mut registry = ToolRegistry::new();
        registry.register("repeat", Arc::new(EchoTool));
        assert!(registry.resolve("repeat").is_ok());
        assert!(registry.resolve("echo").is_err());
    }

    #[tokio::test]
    async fn last_writer_wins() {
        let mut registry = ToolRegistry::new();
        registry.register("voice", Arc::new(EchoTool));
        registry.register("voice", Arc::new(ShoutTool));
        assert_eq!(registry.len(), 1);

        let tool = registry.resolve("voice").unwrap();
        assert_eq!(tool.run("hi").await.unwrap(), "HI");
    }

    #[test]
    fn unregister_is_a_noop_for_unknown_names() {
        let mut registry = ToolRegistry::new();
        registry.register_tool(Arc::new(EchoTool));
        registry.unregister("missing");
        assert_eq!(registry.len(), 1);

        registry.unregister("echo");
        assert!(registry.is_empty());
        assert!(registry.resolve("echo").is_err());
    }

    #[test]
    fn names_is_stable_without_mutation() {
        let mut registry = ToolRegistry::new();
        registry.register_tool(Arc::new(EchoTool));
        registry.register_tool(Arc::new(ShoutTool));

        let first = registry.names();
        let second = registry.names();
        assert_eq!(first, second);
        assert_eq!(first.into_iter().collect::<Vec<_>>(), vec!["echo", "shout"]);

        let a = registry.resolve("echo").unwrap();
        let b = registry.resolve("echo").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn names_is_a_snapshot() {
        let mut registry = ToolRegistry::new();
        registry.register_tool(Arc::new(EchoTool));
        let snapshot = registry.names();
        registry.register_tool(Arc::new(ShoutTool));
        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.names().len(), 2);
    }
}
