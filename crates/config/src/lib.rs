//! Configuration loading, validation, and management for Sleuth.
//!
//! Loads configuration from `~/.sleuth/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.sleuth/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Planning loop settings
    #[serde(default)]
    pub research: ResearchConfig,

    /// Built-in tool settings
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Conversation history storage
    #[serde(default)]
    pub history: HistoryConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.0
}
fn default_max_tokens() -> u32 {
    2048
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("research", &self.research)
            .field("tools", &self.tools)
            .field("history", &self.history)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

/// Settings for the planning loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    /// Hard cap on planning rounds per research call
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Distinct tools that must have run before the loop accepts a final summary
    #[serde(default = "default_min_tools")]
    pub min_tools_for_convergence: usize,

    /// How many past exchanges are shown to the model as context
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Past summaries are cut to this many characters in the prompt
    #[serde(default = "default_summary_preview_chars")]
    pub summary_preview_chars: usize,

    /// Summary returned when the model never produced a usable one
    #[serde(default = "default_fallback_summary")]
    pub fallback_summary: String,
}

fn default_max_iterations() -> u32 {
    5
}
fn default_min_tools() -> usize {
    2
}
fn default_history_window() -> usize {
    3
}
fn default_summary_preview_chars() -> usize {
    200
}
fn default_fallback_summary() -> String {
    "Unable to complete research".into()
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            min_tools_for_convergence: default_min_tools(),
            history_window: default_history_window(),
            summary_preview_chars: default_summary_preview_chars(),
            fallback_summary: default_fallback_summary(),
        }
    }
}

/// Settings for the built-in tools.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// DuckDuckGo Instant Answer endpoint
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// MediaWiki API endpoint
    #[serde(default = "default_wiki_url")]
    pub wiki_url: String,

    /// How many encyclopedia pages to summarize per lookup
    #[serde(default = "default_wiki_results")]
    pub wiki_results: usize,

    /// File the save tool appends to
    #[serde(default = "default_save_path")]
    pub save_path: PathBuf,

    /// Per-request timeout for network tools
    #[serde(default = "default_tool_timeout")]
    pub timeout_secs: u64,
}

fn default_search_url() -> String {
    "https://api.duckduckgo.com/".into()
}
fn default_wiki_url() -> String {
    "https://en.wikipedia.org/w/api.php".into()
}
fn default_wiki_results() -> usize {
    3
}
fn default_save_path() -> PathBuf {
    PathBuf::from("research_output.txt")
}
fn default_tool_timeout() -> u64 {
    20
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            wiki_url: default_wiki_url(),
            wiki_results: default_wiki_results(),
            save_path: default_save_path(),
            timeout_secs: default_tool_timeout(),
        }
    }
}

/// Where past exchanges are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// "memory" (process lifetime), "file" (JSONL on disk) or "none"
    #[serde(default = "default_history_backend")]
    pub backend: String,

    /// JSONL path for the file backend (defaults to `~/.sleuth/history.jsonl`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

fn default_history_backend() -> String {
    "memory".into()
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            backend: default_history_backend(),
            path: None,
        }
    }
}

impl HistoryConfig {
    /// The JSONL path for the file backend.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| AppConfig::config_dir().join("history.jsonl"))
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

const HISTORY_BACKENDS: &[&str] = &["memory", "file", "none"];

impl AppConfig {
    /// Load configuration from the default path (~/.sleuth/config.toml).
    ///
    /// Also checks environment variables for API keys:
    /// - `SLEUTH_API_KEY` (highest priority)
    /// - `OPENAI_API_KEY`
    /// - `OPENROUTER_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if self.api_key.is_none() {
            self.api_key = std::env::var("SLEUTH_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok());
        }

        if let Ok(provider) = std::env::var("SLEUTH_PROVIDER") {
            self.default_provider = provider;
        }

        if let Ok(model) = std::env::var("SLEUTH_MODEL") {
            self.default_model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".sleuth")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.default_temperature) {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.research.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "research.max_iterations must be at least 1".into(),
            ));
        }

        if self.research.history_window == 0 {
            return Err(ConfigError::ValidationError(
                "research.history_window must be at least 1".into(),
            ));
        }

        if !HISTORY_BACKENDS.contains(&self.history.backend.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "history.backend must be one of {}, got '{}'",
                HISTORY_BACKENDS.join(", "),
                self.history.backend
            )));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            research: ResearchConfig::default(),
            tools: ToolsConfig::default(),
            history: HistoryConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.default_model, "gpt-4o-mini");
        assert_eq!(config.research.max_iterations, 5);
        assert_eq!(config.research.min_tools_for_convergence, 2);
        assert_eq!(config.research.history_window, 3);
        assert_eq!(config.research.summary_preview_chars, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.default_provider, config.default_provider);
        assert_eq!(parsed.tools.save_path, config.tools.save_path);
        assert_eq!(parsed.research.fallback_summary, config.research.fallback_summary);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            default_temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_iterations_rejected() {
        let mut config = AppConfig::default();
        config.research.max_iterations = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_iterations"));
    }

    #[test]
    fn unknown_history_backend_rejected() {
        let mut config = AppConfig::default();
        config.history.backend = "redis".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("redis"));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().default_provider, "openai");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_model = "gpt-4o"

[research]
max_iterations = 8
min_tools_for_convergence = 1

[history]
backend = "file"
path = "/tmp/sleuth-history.jsonl"

[providers.openrouter]
api_url = "https://openrouter.ai/api/v1"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.default_model, "gpt-4o");
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.research.max_iterations, 8);
        assert_eq!(config.research.min_tools_for_convergence, 1);
        assert_eq!(config.research.history_window, 3);
        assert_eq!(
            config.history.resolved_path(),
            PathBuf::from("/tmp/sleuth-history.jsonl")
        );
        assert!(config.providers.contains_key("openrouter"));
    }

    #[test]
    fn invalid_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "default_temperature = \"hot\"").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("gpt-4o-mini"));
        assert!(toml_str.contains("research_output.txt"));
    }
}
