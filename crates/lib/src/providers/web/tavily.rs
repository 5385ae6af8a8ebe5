use super::WebSearchProvider;
use crate::{errors::RagError, types::WebSearchResult};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_TAVILY_URL: &str = "https://api.tavily.com/search";

#[derive(Serialize, Debug)]
struct TavilySearchRequest<'a> {
    query: &'a str,
    max_results: usize,
    search_depth: &'a str,
    include_raw_content: bool,
}

#[derive(Deserialize, Debug)]
struct TavilySearchResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Deserialize, Debug)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    url: String,
    #[serde(default)]
    content: String,
}

/// Web search through the Tavily API.
#[derive(Clone, Debug)]
pub struct TavilyProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
}

impl TavilyProvider {
    pub fn new(api_url: Option<String>, api_key: String) -> Result<Self, RagError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(RagError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url: api_url.unwrap_or_else(|| DEFAULT_TAVILY_URL.to_string()),
            api_key,
        })
    }
}

#[async_trait]
impl WebSearchProvider for TavilyProvider {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<WebSearchResult>, RagError> {
        let body = TavilySearchRequest {
            query,
            max_results,
            search_depth: "basic",
            include_raw_content: false,
        };
        debug!(max_results, "--> Sending Tavily search request");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RagError::WebSearch(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(RagError::WebSearch(format!("Tavily returned {status}: {text}")));
        }

        let parsed: TavilySearchResponse = response
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
