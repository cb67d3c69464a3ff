//! Save tool: append research notes to a local file.

use async_trait::async_trait;
use sleuth_config::ToolsConfig;
use sleuth_core::error::ToolError;
use sleuth_core::tool::Tool;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

const NAME: &str = "save_tool";

pub struct SaveTool {
    path: PathBuf,
}

impl SaveTool {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &ToolsConfig) -> Self {
        Self::new(config.save_path.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn failed(reason: String) -> ToolError {
        ToolError::ExecutionFailed {
            tool_name: NAME.into(),
            reason,
        }
    }
}

#[async_trait]
impl Tool for SaveTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Save research results to a file."
    }

    async fn run(&self, input: &str) -> Result<String, ToolError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Self::failed(format!("Failed to create directory: {e}")))?;
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| Self::failed(format!("Failed to open file: {e}")))?;

        let mut line = String::with_capacity(input.len() + 1);
        line.push_str(input);
        line.push('\n');
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| Self::failed(format!("Failed to write file: {e}")))?;
        file.flush()
            .await
            .map_err(|e| Self::failed(format!("Failed to write file: {e}")))?;

        Ok(format!("Data saved to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn appends_each_call() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("notes.txt");
        let tool = SaveTool::new(&file_path);

        let out = tool.run("first finding").await.unwrap();
        assert_eq!(out, format!("Data saved to {}", file_path.display()));
        tool.run("second finding").await.unwrap();

        let content = std::fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "first finding\nsecond finding\n");
    }

    #[tokio::test]
    async fn creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("nested").join("dir").join("out.txt");

        SaveTool::new(&file_path).run("nested content").await.unwrap();
        assert!(file_path.exists());
    }

    #[tokio::test]
    async fn unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending
        let tool = SaveTool::new(dir.path());
        let err = tool.run("data").await.unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { ref tool_name, .. } if tool_name == "save_tool"));
    }

    #[test]
    fn default_path_from_config() {
        let tool = SaveTool::from_config(&ToolsConfig::default());
        assert_eq!(tool.path(), Path::new("research_output.txt"));
        assert_eq!(tool.name(), "save_tool");
    }
}
