//! In-memory stand-ins for the external services the RAG pipeline talks to.

use async_trait::async_trait;
use noterag::{
    errors::RagError,
    providers::{ai::AiProvider, db::DocumentRepository, web::WebSearchProvider},
    types::{Document, WebSearchResult},
};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

// --- Mock AI Provider ---

#[derive(Clone, Debug, Default)]
pub struct MockAiProvider {
    responses: Arc<Mutex<HashMap<String, String>>>,
    default_response: Arc<Mutex<Option<String>>>,
    failure: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockAiProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that answers every prompt with `response`.
    pub fn answering(response: &str) -> Self {
        let provider = Self::new();
        *provider.default_response.lock().unwrap() = Some(response.to_string());
        provider
    }

    /// A provider whose every call fails with an upstream API error.
    pub fn failing(message: &str) -> Self {
        let provider = Self::new();
        *provider.failure.lock().unwrap() = Some(message.to_string());
        provider
    }

    /// Pre-programs a response for a specific prompt.
    /// The key should be a unique substring of the system prompt.
    pub fn add_response(&self, key: &str, response: &str) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(key.to_string(), response.to_string());
    }

    /// Retrieves the recorded `(system_prompt, user_prompt)` calls for assertion.
    pub fn get_calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, RagError> {
        self.calls
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), user_prompt.to_string()));

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(RagError::AiApi(message));
        }

        let responses = self.responses.lock().unwrap();
        for (key, response) in responses.iter() {
            if system_prompt.contains(key) {
                return Ok(response.clone());
            }
        }

        self.default_response.lock().unwrap().clone().ok_or_else(|| {
            RagError::AiApi(format!(
                "MockAiProvider: No response programmed for system prompt. Got: '{system_prompt}'"
            ))
        })
    }
}

// --- Mock Document Repository ---

/// Returns its stored documents in insertion order for every similarity query.
#[derive(Clone, Debug, Default)]
pub struct MockDocumentRepository {
    documents: Arc<Mutex<Vec<Document>>>,
    queries: Arc<Mutex<Vec<(String, usize)>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<Document>) -> Self {
        let repository = Self::new();
        *repository.documents.lock().unwrap() = documents;
        repository
    }

    /// Makes every call fail with a vector store error.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn documents(&self) -> Vec<Document> {
        self.documents.lock().unwrap().clone()
    }

    /// The `(query, top_k)` pairs passed to `find_similar`.
    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<(), RagError> {
        match self.failure.lock().unwrap().clone() {
            Some(message) => Err(RagError::VectorStore(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentRepository for MockDocumentRepository {
    fn name(&self) -> &str {
        "MockRepository"
    }

    async fn add_documents(&self, documents: Vec<Document>) -> Result<usize, RagError> {
        self.check_failure()?;
        let count = documents.len();
        self.documents.lock().unwrap().extend(documents);
        Ok(count)
    }

    async fn find_similar(&self, query: &str, top_k: usize) -> Result<Vec<Document>, RagError> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), top_k));
        self.check_failure()?;
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .take(top_k)
            .cloned()
            .collect())
    }
}

// --- Mock Web Search ---

#[derive(Clone, Debug, Default)]
pub struct MockWebSearch {
    results: Arc<Mutex<Vec<WebSearchResult>>>,
    calls: Arc<Mutex<Vec<(String, usize)>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MockWebSearch {
    pub fn with_results(results: Vec<WebSearchResult>) -> Self {
        let search = Self::default();
        *search.results.lock().unwrap() = results;
        search
    }

    pub fn failing(message: &str) -> Self {
        let search = Self::default();
        *search.failure.lock().unwrap() = Some(message.to_string());
        search
    }

    /// The `(query, max_results)` pairs passed to `search`.
    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebSearchProvider for MockWebSearch {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<WebSearchResult>, RagError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(RagError::WebSearch(message));
        }
        Ok(self
            .results
            .lock()
            .unwrap()
            .iter()
            .take(max_results)
            .cloned()
            .collect())
    }
}

// --- Test-Specific Helpers ---

/// A note with a `source` entry in its metadata.
pub fn note(content: &str, source: &str) -> Document {
    Document::new(content).with_metadata("source", source)
}

pub fn web_result(title: &str, url: &str, content: &str) -> WebSearchResult {
    WebSearchResult {
        title: title.to_string(),
        url: url.to_string(),
        content: content.to_string(),
    }
}
