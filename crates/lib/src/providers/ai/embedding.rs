//! # Embeddings Provider
//!
//! Generates vector embeddings by calling an external, OpenAI-compatible
//! embeddings API (Ollama exposes one at `/v1/embeddings`).

use crate::errors::RagError;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize, Debug)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize, Debug)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize, Debug)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// A reusable handle to an embeddings endpoint.
#[derive(Clone, Debug)]
pub struct EmbeddingClient {
    client: ReqwestClient,
    api_url: String,
    model: String,
    api_key: Option<String>,
}

impl EmbeddingClient {
    pub fn new(
        api_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, RagError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(RagError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            model: model.into(),
            api_key,
        })
    }

    /// Embeds a single piece of text.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, RagError> {
        let request_body = EmbeddingRequest {
            model: &self.model,
            input,
        };
        debug!(model = %self.model, chars = input.len(), "--> Sending request to embeddings API");

        let mut request_builder = self.client.post(&self.api_url).json(&request_body);
        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        let response = request_builder
            .send()
            .await
            .map_err(RagError::AiRequest)?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(RagError::AiApi(error_text));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(RagError::AiDeserialization)?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| RagError::AiApi("embeddings API returned no embeddings".to_string()))
    }
}
