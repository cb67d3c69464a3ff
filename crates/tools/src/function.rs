//! Closure-backed tools, for callers who want to plug in a capability
//! without writing a [`Tool`] impl.

use async_trait::async_trait;
use sleuth_core::error::ToolError;
use sleuth_core::tool::Tool;

/// A tool whose behaviour is a plain synchronous function of its input.
///
/// ```
/// use sleuth_tools::FnTool;
/// use sleuth_core::tool::Tool;
///
/// let upper = FnTool::new("upper", "Uppercase the query", |q: &str| Ok(q.to_uppercase()));
/// assert_eq!(upper.name(), "upper");
/// ```
pub struct FnTool<F> {
    name: String,
    description: String,
    func: F,
}

impl<F> FnTool<F>
where
    F: Fn(&str) -> Result<String, ToolError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, description: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            func,
        }
    }
}

#[async_trait]
impl<F> Tool for FnTool<F>
where
    F: Fn(&str) -> Result<String, ToolError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    async fn run(&self, input: &str) -> Result<String, ToolError> {
        (self.func)(input)
    }
}
