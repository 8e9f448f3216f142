//! Configuration loading, validation, and management for PromptRelay.
//!
//! Loads configuration from `~/.promptrelay/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use promptrelay_core::template::{MissingKeyPolicy, PromptTemplate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.promptrelay/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Bearer credential for the inference endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for chat completions
    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    /// Model used for embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Per-request deadline, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Template rendering settings
    #[serde(default)]
    pub template: TemplateConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// The agent: identity, prompt pool and pipeline
    #[serde(default)]
    pub agent: AgentConfig,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_chat_model() -> String {
    "gpt-4o-mini".into()
}
fn default_embedding_model() -> String {
    "text-embedding-ada-002".into()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_request_timeout_secs() -> u64 {
    120
}

/// Redact a secret string for Debug output.
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
            .field("base_url", &self.base_url)
            .field("chat_model", &self.chat_model)
            .field("embedding_model", &self.embedding_model)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("template", &self.template)
            .field("logging", &self.logging)
            .field("agent", &self.agent)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// `"empty"` renders unknown placeholders as nothing, `"error"` fails
    #[serde(default)]
    pub on_missing_key: MissingKeyPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Append-only interaction log. Relative paths resolve against the cwd.
    #[serde(default = "default_interaction_log")]
    pub interaction_log: PathBuf,

    /// Whether to write the interaction log at all
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_interaction_log() -> PathBuf {
    PathBuf::from("llm_interactions.log")
}
fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            interaction_log: default_interaction_log(),
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_agent_id")]
    pub id: String,

    #[serde(default = "default_agent_name")]
    pub name: String,

    #[serde(default = "default_agent_description")]
    pub description: String,

    /// Candidate system prompts, ranked against each incoming message
    #[serde(default = "default_prompt_pool")]
    pub prompt_pool: Vec<String>,

    /// Ordered pipeline stages for `run`
    #[serde(default = "default_pipeline")]
    pub pipeline: Vec<PromptTemplate>,

    /// Values substituted into the selected prompt unless overridden per call
    #[serde(default = "default_prompt_values")]
    pub default_values: HashMap<String, String>,
}

fn default_agent_id() -> String {
    "agent001".into()
}
fn default_agent_name() -> String {
    "InfoSeeker".into()
}
fn default_agent_description() -> String {
    "An agent that searches for information".into()
}
fn default_prompt_pool() -> Vec<String> {
    vec![
        "You are an AI assistant named {{.name}}. Your task is to {{.task}}.".into(),
        "As {{.name}}, your primary function is to {{.task}}. Provide verbose, fully detailed, and accurate information.".into(),
        "You are an AI assistant named {{.name}}. Your task is to {{.task}}. Only provide a one sentence answer.".into(),
    ]
}
fn default_pipeline() -> Vec<PromptTemplate> {
    vec![
        PromptTemplate::new("Initial", "Analyze this: {{.Input}}"),
        PromptTemplate::new("Elaborate", "Provide more details on: {{.Input}}"),
        PromptTemplate::new("Summarize", "Summarize the key points: {{.Input}}"),
    ]
}
fn default_prompt_values() -> HashMap<String, String> {
    HashMap::from([
        ("name".to_string(), "InfoSeeker".to_string()),
        (
            "task".to_string(),
            "provide information about various topics".to_string(),
        ),
    ])
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            id: default_agent_id(),
            name: default_agent_name(),
            description: default_agent_description(),
            prompt_pool: default_prompt_pool(),
            pipeline: default_pipeline(),
            default_values: default_prompt_values(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.promptrelay/config.toml).
    ///
    /// Environment variables override the file:
    /// - `PROMPTRELAY_API_KEY` (highest priority), then `OPENAI_API_KEY`
    /// - `PROMPTRELAY_BASE_URL`
    /// - `PROMPTRELAY_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
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

    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.api_key.is_none() {
            self.api_key = lookup("PROMPTRELAY_API_KEY").or_else(|| lookup("OPENAI_API_KEY"));
        }

        if let Some(url) = lookup("PROMPTRELAY_BASE_URL") {
            self.base_url = url;
        }

        if let Some(model) = lookup("PROMPTRELAY_MODEL") {
            self.chat_model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".promptrelay")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "request_timeout_secs must be > 0".into(),
            ));
        }

        if self.agent.prompt_pool.is_empty() {
            return Err(ConfigError::ValidationError(
                "agent.prompt_pool must contain at least one prompt".into(),
            ));
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
            base_url: default_base_url(),
            chat_model: default_chat_model(),
            embedding_model: default_embedding_model(),
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout_secs(),
            template: TemplateConfig::default(),
            logging: LoggingConfig::default(),
            agent: AgentConfig::default(),
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
