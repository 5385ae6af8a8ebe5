//! # Provider Factory
//!
//! Turns plain configuration values into provider instances, so the server,
//! the CLI and tests all build providers the same way.

use crate::{
    errors::RagError,
    providers::{
        ai::{
            local::LocalAiProvider,
            ollama::{OllamaProvider, DEFAULT_OLLAMA_URL, DEFAULT_TEMPERATURE},
            AiProvider,
        },
        web::{SearxngProvider, TavilyProvider, WebSearchProvider},
    },
};
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

fn default_provider_kind() -> String {
    "ollama".to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_timeout_secs() -> u64 {
    120
}

/// Settings for the chat model that writes the answer.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ProviderConfig {
    /// `"ollama"` (native API) or `"local"` (OpenAI-compatible).
    #[serde(default = "default_provider_kind")]
    pub provider: String,
    /// Base URL for `ollama`; full chat-completions URL for `local`.
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    pub model_name: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Settings for the optional web-search step.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct WebSearchConfig {
    /// `"tavily"` or `"searxng"`.
    pub provider: String,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Creates the chat provider described by `config`.
pub fn create_ai_provider(config: &ProviderConfig) -> Result<Box<dyn AiProvider>, RagError> {
    let timeout = Some(Duration::from_secs(config.timeout_secs));
    let provider: Box<dyn AiProvider> = match config.provider.as_str() {
        "ollama" => {
            let base_url = config.api_url.as_deref().unwrap_or(DEFAULT_OLLAMA_URL);
            info!("Configuring Ollama provider at {base_url} with model '{}'", config.model_name);
            Box::new(OllamaProvider::new(
                base_url,
                config.model_name.clone(),
                config.temperature,
                timeout,
            )?)
        }
        "local" => {
            let api_url = config.api_url.clone().ok_or_else(|| {
                RagError::Validation("api_url is required for the 'local' provider".to_string())
            })?;
            info!("Configuring OpenAI-compatible provider at {api_url}");
            Box::new(LocalAiProvider::with_options(
                api_url,
                config.api_key.clone(),
                Some(config.model_name.clone()),
                config.temperature,
                timeout,
            )?)
        }
        other => {
            return Err(RagError::Validation(format!(
                "Unsupported AI provider: '{other}'"
            )))
        }
    };
    Ok(provider)
}

/// Creates the web-search provider described by `config`.
pub fn create_web_search_provider(
    config: &WebSearchConfig,
) -> Result<Box<dyn WebSearchProvider>, RagError> {
    match config.provider.as_str() {
        "tavily" => {
            let api_key = config
                .api_key
                .clone()
                .filter(|k| !k.is_empty())
                .ok_or_else(|| {
                    RagError::Validation("api_key is required for the 'tavily' provider".to_string())
                })?;
            Ok(Box::new(TavilyProvider::new(config.api_url.clone(), api_key)?))
        }
        "searxng" => {
            let base_url = config.api_url.as_deref().ok_or_else(|| {
                RagError::Validation("api_url is required for the 'searxng' provider".to_string())
            })?;
            Ok(Box::new(SearxngProvider::new(base_url)?))
        }
        other => Err(RagError::Validation(format!(
            "Unsupported web search provider: '{other}'"
        ))),
    }
}
