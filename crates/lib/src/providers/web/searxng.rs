use super::WebSearchProvider;
use crate::{errors::RagError, types::WebSearchResult};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use tracing::debug;

#[derive(Deserialize, Debug)]
struct SearxngResponse {
    #[serde(default)]
    results: Vec<SearxngResult>,
}

#[derive(Deserialize, Debug)]
struct SearxngResult {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    content: String,
}

/// Web search against a self-hosted SearXNG instance (JSON output must be enabled).
#[derive(Clone, Debug)]
pub struct SearxngProvider {
    client: ReqwestClient,
    search_url: String,
}

impl SearxngProvider {
    pub fn new(base_url: &str) -> Result<Self, RagError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(RagError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            search_url: format!("{}/search", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl WebSearchProvider for SearxngProvider {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<WebSearchResult>, RagError> {
        debug!(url = %self.search_url, "--> Sending SearXNG search request");
        let response = self
            .client
            .get(&self.search_url)
            .query(&[("q", query), ("format", "json")])
            .send()
            .await
            .map_err(|e| RagError::WebSearch(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(RagError::WebSearch(format!("SearXNG returned {status}")));
        }

        let parsed: SearxngResponse = response
            .json()
            .await
            .map_err(|e| RagError::WebSearch(e.to_string()))?;

        Ok(parsed
            .results
            .into_iter()
            .take(max_results)
            .map(|r| WebSearchResult {
                title: r.title,
                url: r.url,
                content: r.content,
            })
            .collect())
    }
}
