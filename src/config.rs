//! Configuration management for Wayfarer
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, WayfarerError};
use crate::session::MIN_RECENT_MESSAGES;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Wayfarer
///
/// Holds provider settings, orchestrator limits, the session window
/// policy, storage location and HTTP server binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider configuration (Ollama, OpenAI-compatible)
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Agent orchestrator limits
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    /// Session window and summarization settings
    #[serde(default)]
    pub session: SessionConfig,
    /// Session store settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Provider configuration
///
/// Specifies which AI provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type", default = "default_provider_type")]
    pub provider_type: String,

    /// Ollama configuration
    #[serde(default)]
    pub ollama: OllamaConfig,

    /// OpenAI-compatible configuration
    #[serde(default)]
    pub openai: OpenAiConfig,
}

fn default_provider_type() -> String {
    "ollama".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider_type: default_provider_type(),
            ollama: OllamaConfig::default(),
            openai: OpenAiConfig::default(),
        }
    }
}

/// Ollama provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama server host
    #[serde(default = "default_ollama_host")]
    pub host: String,

    /// Model to use for Ollama
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_host() -> String {
    "http://localhost:11434".to_string()
}

fn default_ollama_model() -> String {
    "llama3.2:latest".to_string()
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_ollama_host(),
            model: default_ollama_model(),
        }
    }
}

/// OpenAI-compatible provider configuration
///
/// Any gateway exposing `/chat/completions` (OpenRouter, vLLM, OpenAI)
/// can be targeted by changing `api_base`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Base URL of the chat completions API
    #[serde(default = "default_openai_api_base")]
    pub api_base: String,

    /// Model to request
    #[serde(default = "default_openai_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_openai_api_key_env")]
    pub api_key_env: String,
}

fn default_openai_api_base() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_openai_model() -> String {
    "google/gemini-2.5-flash".to_string()
}

fn default_openai_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: default_openai_api_base(),
            model: default_openai_model(),
            api_key_env: default_openai_api_key_env(),
        }
    }
}

/// Agent orchestrator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Timeout for a single orchestrator attempt (seconds)
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Number of provider attempts before the request fails
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_timeout() -> u64 {
    300
}

fn default_max_attempts() -> u32 {
    1
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// Session window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum raw messages retained per session after a request cycle
    #[serde(default = "default_max_recent_messages")]
    pub max_recent_messages: usize,

    /// Optional lighter model used for rolling summaries
    #[serde(default)]
    pub summary_model: Option<String>,
}

fn default_max_recent_messages() -> usize {
    6
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_recent_messages: default_max_recent_messages(),
            summary_model: None,
        }
    }
}

/// Session store configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database; the user data directory when unset
    #[serde(default)]
    pub path: Option<String>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_server_host")]
    pub host: String,

    /// Port to bind
    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default_config()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn default_config() -> Self {
        Self {
            provider: ProviderConfig::default(),
            orchestrator: OrchestratorConfig::default(),
            session: SessionConfig::default(),
            storage: StorageConfig::default(),
            server: ServerConfig::default(),
        }
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| WayfarerError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| WayfarerError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(provider_type) = std::env::var("WAYFARER_PROVIDER") {
            self.provider.provider_type = provider_type;
        }

        if let Ok(ollama_host) = std::env::var("WAYFARER_OLLAMA_HOST") {
            self.provider.ollama.host = ollama_host;
        }

        if let Ok(ollama_model) = std::env::var("WAYFARER_OLLAMA_MODEL") {
            self.provider.ollama.model = ollama_model;
        }

        if let Ok(api_base) = std::env::var("WAYFARER_OPENAI_API_BASE") {
            self.provider.openai.api_base = api_base;
        }

        if let Ok(openai_model) = std::env::var("WAYFARER_OPENAI_MODEL") {
            self.provider.openai.model = openai_model;
        }

        if let Ok(summary_model) = std::env::var("WAYFARER_SUMMARY_MODEL") {
            self.session.summary_model = Some(summary_model);
        }

        if let Ok(max_recent) = std::env::var("WAYFARER_MAX_RECENT_MESSAGES") {
            if let Ok(value) = max_recent.parse() {
                self.session.max_recent_messages = value;
            } else {
                tracing::warn!("Invalid WAYFARER_MAX_RECENT_MESSAGES: {}", max_recent);
            }
        }

        if let Ok(timeout) = std::env::var("WAYFARER_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.orchestrator.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid WAYFARER_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(db_path) = std::env::var("WAYFARER_SESSION_DB") {
            self.storage.path = Some(db_path);
        }

        if let Ok(host) = std::env::var("WAYFARER_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("WAYFARER_PORT") {
            if let Ok(value) = port.parse() {
                self.server.port = value;
            } else {
                tracing::warn!("Invalid WAYFARER_PORT: {}", port);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(db_path) = &cli.storage_path {
            self.storage.path = Some(db_path.clone());
        }

        if let crate::cli::Commands::Serve { host, port } = &cli.command {
            if let Some(host) = host {
                self.server.host = host.clone();
            }
            if let Some(port) = port {
                self.server.port = *port;
            }
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type.is_empty() {
            return Err(WayfarerError::Config("Provider type cannot be empty".to_string()).into());
        }

        let valid_providers = ["ollama", "openai"];
        if !valid_providers.contains(&self.provider.provider_type.as_str()) {
            return Err(WayfarerError::Config(format!(
                "Invalid provider type: {}. Must be one of: {}",
                self.provider.provider_type,
                valid_providers.join(", ")
            ))
            .into());
        }

        if self.provider.ollama.model.is_empty() || self.provider.openai.model.is_empty() {
            return Err(WayfarerError::Config("Provider model cannot be empty".to_string()).into());
        }

        if let Some(model) = &self.session.summary_model {
            if model.trim().is_empty() {
                return Err(WayfarerError::Config(
                    "session.summary_model cannot be blank when set".to_string(),
                )
                .into());
            }
        }

        // MAX/2 must be at least 2 for the window to shrink back under
        // the limit after a +2 cycle.
        if self.session.max_recent_messages < MIN_RECENT_MESSAGES {
            return Err(WayfarerError::Config(format!(
                "session.max_recent_messages must be at least {}",
                MIN_RECENT_MESSAGES
            ))
            .into());
        }

        if self.orchestrator.timeout_seconds == 0 {
            return Err(WayfarerError::Config(
                "orchestrator.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.orchestrator.max_attempts == 0 || self.orchestrator.max_attempts > 10 {
            return Err(WayfarerError::Config(
                "orchestrator.max_attempts must be between 1 and 10".to_string(),
            )
            .into());
        }

        if self.server.port == 0 {
            return Err(
                WayfarerError::Config("server.port must be greater than 0".to_string()).into(),
            );
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
