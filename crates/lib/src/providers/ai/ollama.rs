//! # Ollama Provider
//!
//! A thin client for Ollama's native chat API (`POST {base}/api/chat`),
//! always used in non-streaming mode.

use crate::{errors::RagError, providers::ai::AiProvider};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Low temperature keeps answers close to the supplied context.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Ollama's default listen address.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

#[derive(Serialize, Debug)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: [OllamaMessage<'a>; 2],
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize, Debug)]
struct OllamaMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize, Debug)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Deserialize, Debug)]
struct OllamaChatResponse {
    message: OllamaResponseMessage,
}

#[derive(Deserialize, Debug)]
struct OllamaResponseMessage {
    content: String,
}

/// A provider backed by a local Ollama runtime.
#[derive(Clone, Debug)]
pub struct OllamaProvider {
    client: ReqwestClient,
    chat_url: String,
    model: String,
    temperature: f32,
}

impl OllamaProvider {
    /// Creates a provider for `model` served at `base_url` (e.g. `http://localhost:11434`).
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        temperature: f32,
        timeout: Option<Duration>,
    ) -> Result<Self, RagError> {
        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(RagError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            chat_url: format!("{}/api/chat", base_url.trim_end_matches('/')),
            model: model.into(),
            temperature,
        })
    }
}

#[async_trait]
impl AiProvider for OllamaProvider {
    #[instrument(skip_all, fields(model = %self.model))]
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, RagError> {
        let body = OllamaChatRequest {
            model: &self.model,
            messages: [
                OllamaMessage {
                    role: "system",
                    content: system_prompt,
                },
                OllamaMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
            },
        };

        debug!("POST {}", self.chat_url);
        let response = self
            .client
            .post(&self.chat_url)
            .json(&body)
            .send()
            .await
            .map_err(RagError::AiRequest)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(240).collect();
            return Err(RagError::AiApi(format!(
                "unexpected status {status} from {}: {snippet}",
                self.chat_url
            )));
        }

        let out: OllamaChatResponse = response
            .json()
            .await
            .map_err(RagError::AiDeserialization)?;

        Ok(out.message.content)
    }
}
