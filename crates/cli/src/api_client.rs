//! # API Client
//!
//! This module provides a client for the `noterag-server` query endpoint.
//! It handles request construction and response parsing, and normalises every
//! failure into a `ClientError`.

use async_trait::async_trait;
use noterag::{QueryRequest, QueryResponse};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// How long a query may take before the client gives up.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Everything that can go wrong while calling the server.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error("API error: {status}")]
    Api { status: u16 },
    /// The request never produced a response (connection refused, timeout...).
    #[error("Network error: {0}")]
    Transport(String),
    /// The server answered 2xx but the body was not a `QueryResponse`.
    #[error("Invalid response from server: {0}")]
    Decode(String),
    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

/// Sends a `QueryRequest` somewhere and returns the answer.
///
/// The query controller is written against this trait so it can be driven by
/// something other than a live server.
#[async_trait]
pub trait QueryTransport: Send + Sync {
    async fn submit_query(&self, request: &QueryRequest) -> Result<QueryResponse, ClientError>;
}

/// The client for making API calls to `noterag-server`.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a new `ApiClient` for the server at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl QueryTransport for ApiClient {
    async fn submit_query(&self, request: &QueryRequest) -> Result<QueryResponse, ClientError> {
        let url = format!("{}/api/rag/query", self.base_url);
        info!("Submitting query to: {}", url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!("Server responded with {status}");
            return Err(ClientError::Api {
                status: status.as_u16(),
            });
        }

        response
            .json::<QueryResponse>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}
