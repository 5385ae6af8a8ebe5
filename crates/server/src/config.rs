//! # Application Configuration
//!
//! Defines the configuration of `noterag-server` and loads it from a
//! `config.yml` file layered with environment variables.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use noterag::{
    providers::factory::{ProviderConfig, WebSearchConfig},
    RagDefaults,
};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::env;
use std::fs;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from the `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The chat model that writes answers.
    pub ai: ProviderConfig,
    /// The embedding model used by the vector store.
    #[serde(default)]
    pub embedding: Option<EmbeddingConfig>,
    /// The vector store holding the knowledge base. Without one, answers
    /// rely on web results (if any) and the model alone.
    #[serde(default)]
    pub vector_store: Option<VectorStoreConfig>,
    #[serde(default)]
    pub web_search: Option<WebSearchConfig>,
    #[serde(default)]
    pub rag: RagDefaults,
    #[serde(default)]
    pub knowledgebase: KnowledgebaseConfig,
    /// Confluence spaces to scrape into the vector store at startup.
    #[serde(default)]
    pub confluence: Option<ConfluenceConfig>,
}

/// Provides a default value for the `port` field if not set in the environment.
fn default_port() -> u16 {
    8080
}

/// Configuration for the embedding model provider.
#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    pub api_url: String,
    pub model_name: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VectorStoreConfig {
    pub url: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_collection() -> String {
    "notes".to_string()
}

/// Where the Markdown notes live and whether to load them at startup.
#[derive(Debug, Deserialize, Clone)]
pub struct KnowledgebaseConfig {
    #[serde(default)]
    pub init: bool,
    #[serde(default = "default_knowledgebase_folder")]
    pub folder: String,
}

fn default_knowledgebase_folder() -> String {
    "./knowledgebase".to_string()
}

impl Default for KnowledgebaseConfig {
    fn default() -> Self {
        Self {
            init: false,
            folder: default_knowledgebase_folder(),
        }
    }
}

/// Where to scrape Confluence pages from.
#[derive(Debug, Deserialize, Clone)]
pub struct ConfluenceConfig {
    /// Scrape the spaces at startup.
    #[serde(default)]
    pub scrap: bool,
    pub base_url: String,
    /// Space keys, either a YAML list or a comma-separated string.
    #[serde(default, deserialize_with = "deserialize_spaces")]
    pub spaces: Vec<String>,
    #[serde(default)]
    pub token: Option<String>,
    /// Account email; when set the token is sent as basic auth.
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,
    #[serde(default = "default_confluence_timeout")]
    pub timeout_secs: u64,
}

fn default_page_limit() -> usize {
    noterag_confluence::DEFAULT_PAGE_LIMIT
}

fn default_confluence_timeout() -> u64 {
    60
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpaceList {
    Csv(String),
    List(Vec<String>),
}

fn deserialize_spaces<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let spaces = match SpaceList::deserialize(deserializer)? {
        SpaceList::Csv(csv) => csv.split(',').map(str::to_string).collect(),
        SpaceList::List(list) => list,
    };
    Ok(spaces
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

// Helper to read a file, substitute `${VAR}` placeholders from the environment,
// and return its content. Returns Ok(None) if the file does not exist.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        env::var(&caps["var"]).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// Layers, lowest priority first:
/// 1. Built-in defaults (a local Ollama with `llama3.2`).
/// 2. The YAML file: `config_path_override` if given (it must exist), otherwise
///    `config.yml` next to this crate's manifest when present.
/// 3. Top-level keys from plain environment variables (`PORT`).
/// 4. Nested keys from `NOTERAG_` variables (e.g., `NOTERAG_AI__MODEL_NAME`).
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let mut builder = ConfigBuilder::builder()
        .set_default("ai.provider", "ollama")?
        .set_default("ai.api_url", noterag::providers::ai::ollama::DEFAULT_OLLAMA_URL)?
        .set_default("ai.model_name", "llama3.2")?;

    match config_path_override {
        Some(path) => {
            let content = read_and_substitute(path)?.ok_or_else(|| {
                ConfigError::NotFound(format!("Config file not found at '{path}'."))
            })?;
            info!("Loading configuration from '{path}'.");
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None => {
            let default_path = format!("{base_path}/config.yml");
            if let Some(content) = read_and_substitute(&default_path)? {
                info!("Loading configuration from '{default_path}'.");
                builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
            } else {
                info!("'{default_path}' not found. Using built-in defaults and environment.");
            }
        }
    }

    let settings = builder
        .add_source(Environment::default())
        .add_source(
            Environment::with_prefix("NOTERAG")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
