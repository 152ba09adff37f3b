//! Provider module for Wayfarer
//!
//! This module contains the AI provider abstraction and implementations
//! for Ollama and OpenAI-compatible gateways.

pub mod base;
pub mod ollama;
pub mod openai;

pub use base::{CompletionResponse, Message, Provider, TokenUsage};
pub use ollama::OllamaProvider;
pub use openai::OpenAiCompatibleProvider;

use crate::config::ProviderConfig;
use crate::error::{Result, WayfarerError};

/// Create a provider instance based on configuration
///
/// # Errors
///
/// Returns error if provider type is invalid or initialization fails
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn Provider>> {
    create_provider_with_override(config, None)
}

/// Create a provider instance with an optional model override
///
/// Used to build the summarization provider, which may run a lighter
/// model of the configured provider than the one answering the traveller.
///
/// # Arguments
///
/// * `config` - Full provider configuration
/// * `model_override` - Optional model name override
///
/// # Errors
///
/// Returns error if the provider type is unknown or initialization fails
///
/// # Examples
///
/// ```
/// use wayfarer::config::{OllamaConfig, OpenAiConfig, ProviderConfig};
/// use wayfarer::providers::create_provider_with_override;
///
/// let config = ProviderConfig {
///     provider_type: "ollama".to_string(),
///     ollama: OllamaConfig::default(),
///     openai: OpenAiConfig::default(),
/// };
/// let provider = create_provider_with_override(&config, Some("qwen3:0.6b")).unwrap();
/// assert_eq!(provider.model(), "qwen3:0.6b");
/// ```
pub fn create_provider_with_override(
    config: &ProviderConfig,
    model_override: Option<&str>,
) -> Result<Box<dyn Provider>> {
    match config.provider_type.as_str() {
        "ollama" => {
            let mut ollama_config = config.ollama.clone();
            if let Some(model) = model_override {
                ollama_config.model = model.to_string();
            }
            Ok(Box::new(OllamaProvider::new(ollama_config)?))
        }
        "openai" => {
            let mut openai_config = config.openai.clone();
            if let Some(model) = model_override {
                openai_config.model = model.to_string();
            }
            Ok(Box::new(OpenAiCompatibleProvider::new(openai_config)?))
        }
        other => Err(WayfarerError::Provider(format!("Unknown provider type: {}", other)).into()),
    }
}
