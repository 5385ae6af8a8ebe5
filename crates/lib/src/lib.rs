//! # noterag
//!
//! Retrieval-Augmented Generation over a personal knowledge base. A question is
//! answered by a language model from context gathered out of a vector store of
//! notes and, optionally, a web search.

pub mod client;
pub mod errors;
pub mod ingest;
pub mod prompts;
pub mod providers;
pub mod rerank;
pub mod types;

pub use client::{RagClient, RagClientBuilder, RagDefaults};
pub use errors::RagError;
pub use types::{Document, QueryRequest, QueryResponse, Source, WebSearchResult};

use prompts::{build_rag_system_prompt, NO_CONTEXT_FOUND};
use rerank::keyword_rerank;
use tracing::{debug, info, warn};

/// Joins context items with a blank line, or returns the "nothing found"
/// marker when there are none.
pub fn build_context(documents: &[Document]) -> String {
    if documents.is_empty() {
        return NO_CONTEXT_FOUND.to_string();
    }
    documents
        .iter()
        .map(|d| d.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

impl RagClient {
    /// Answers a question.
    ///
    /// 1. Validates the request.
    /// 2. Retrieves up to `topK` notes from the document repository and, when
    ///    requested and configured, up to `webSearchResults` web results. Both
    ///    lookups run concurrently.
    /// 3. Re-ranks the notes and builds the context block.
    /// 4. Asks the AI provider, using the raw question as the user prompt.
    ///
    /// Failures of any upstream service are returned as errors; no answer is
    /// ever made up in their place.
    pub async fn answer(&self, request: &QueryRequest) -> Result<QueryResponse, RagError> {
        request.validate()?;

        let top_k = request
            .top_k
            .unwrap_or(self.defaults.default_top_k)
            .min(self.defaults.max_top_k) as usize;
        let web_limit = request
            .web_search_results
            .unwrap_or(self.defaults.default_web_search_results)
            .min(self.defaults.max_web_search_results) as usize;

        if request.use_web_search && self.web_search.is_none() {
            warn!("Web search requested but no web search provider is configured; skipping.");
        }

        info!(
            top_k,
            use_web_search = request.use_web_search,
            "[answer] received query: {:?}",
            request.query
        );

        let (local, web) = tokio::join!(
            self.retrieve_local(&request.query, top_k),
            self.search_web(&request.query, web_limit, request.use_web_search)
        );
        let local = local?;
        let web = web?;

        let web_search_used = web.is_some();
        let mut documents = keyword_rerank(&request.query, local);
        documents.extend(web.unwrap_or_default());

        let context = build_context(&documents);
        let system_prompt = build_rag_system_prompt(&context);
        debug!(system_prompt = %system_prompt, "--> Sending prompts to AI Provider");

        let answer = self
            .ai_provider
            .generate(&system_prompt, &request.query)
            .await?;

        info!(
            sources = documents.len(),
            web_search_used, "[answer] answer generated"
        );

        Ok(QueryResponse {
            answer,
            web_search_used,
            sources_count: documents.len(),
            sources: documents.iter().map(Source::from).collect(),
        })
    }

    async fn retrieve_local(&self, query: &str, top_k: usize) -> Result<Vec<Document>, RagError> {
        match &self.document_repository {
            Some(repository) => {
                let documents = repository.find_similar(query, top_k).await?;
                debug!("Retrieved {} documents from {}", documents.len(), repository.name());
                Ok(documents)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Returns `None` when the search step did not run.
    async fn search_web(
        &self,
        query: &str,
        limit: usize,
        requested: bool,
    ) -> Result<Option<Vec<Document>>, RagError> {
        let provider = match (&self.web_search, requested) {
            (Some(provider), true) => provider,
            _ => return Ok(None),
        };
        let results = provider.search(query, limit).await?;
        debug!("Web search returned {} results", results.len());
        Ok(Some(
            results.into_iter().take(limit).map(Document::from).collect(),
        ))
    }
}
