//! Configuration loading, validation, and management for paperscope.
//!
//! Loads configuration from `~/.paperscope/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.paperscope/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the model gateway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible completion endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used for both passes
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature for both passes
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens for the title-filter reply (a small JSON object)
    #[serde(default = "default_filter_max_tokens")]
    pub filter_max_tokens: u32,

    /// Max tokens for the abstract-review report
    #[serde(default = "default_review_max_tokens")]
    pub review_max_tokens: u32,

    /// arXiv categories to fetch (e.g. "quant-ph", "cond-mat.str-el")
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,

    /// Override for the per-day cache directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Override for the research interests file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interests_file: Option<PathBuf>,
}

fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}
fn default_model() -> String {
    "anthropic/claude-sonnet-4".into()
}
fn default_temperature() -> f32 {
    0.3
}
fn default_filter_max_tokens() -> u32 {
    2048
}
fn default_review_max_tokens() -> u32 {
    4096
}
fn default_categories() -> Vec<String> {
    vec!["quant-ph".into()]
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("filter_max_tokens", &self.filter_max_tokens)
            .field("review_max_tokens", &self.review_max_tokens)
            .field("categories", &self.categories)
            .field("data_dir", &self.data_dir)
            .field("interests_file", &self.interests_file)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the default location with env overrides.
    ///
    /// Environment variables consulted (highest priority):
    /// - `PAPERSCOPE_API_KEY`, `OPENROUTER_API_KEY`, `OPENAI_API_KEY`
    /// - `PAPERSCOPE_MODEL`
    /// - `PAPERSCOPE_BASE_URL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("PAPERSCOPE_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
                .or_else(|| std::env::var("OPENAI_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("PAPERSCOPE_MODEL") {
            config.model = model;
        }

        if let Ok(base_url) = std::env::var("PAPERSCOPE_BASE_URL") {
            config.base_url = base_url;
        }

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

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".paperscope")
    }

    /// Where per-day cache artifacts live.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("data"))
    }

    /// The research interests file passed through to both prompts.
    pub fn interests_path(&self) -> PathBuf {
        self.interests_file
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("research_interests.md"))
    }

    /// Read the research interests text.
    pub fn load_interests(&self) -> Result<String, ConfigError> {
        let path = self.interests_path();
        std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
            path,
            reason: e.to_string(),
        })
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.categories.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one arXiv category is required".into(),
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

    /// Skeleton research interests file written by `init`.
    pub fn default_interests() -> &'static str {
        "\
# Research interests

Describe the topics you care about, one theme per paragraph. This text is
passed verbatim to the model on both passes, so concrete keywords and named
methods work better than broad areas.

Example:

- Tensor network methods for 2D strongly correlated systems
- Quantum error correction, especially LDPC codes
- Anything connecting machine learning to many-body physics
"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            filter_max_tokens: default_filter_max_tokens(),
            review_max_tokens: default_review_max_tokens(),
            categories: default_categories(),
            data_dir: None,
            interests_file: None,
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

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}
