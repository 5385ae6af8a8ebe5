//! # Core Types
//!
//! The request/response envelope shared by the server and its clients, plus the
//! `Document` unit that flows between the vector store, the web-search step and
//! the prompt builder.

use crate::errors::RagError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of characters kept in a source preview.
pub const SOURCE_PREVIEW_CHARS: usize = 200;

/// The body of `POST /api/rag/query`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    pub query: String,
    #[serde(default)]
    pub use_web_search: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_search_results: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            use_web_search: false,
            web_search_results: None,
            top_k: None,
        }
    }

    /// Rejects requests that cannot be answered: a blank question or a
    /// non-positive result count.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.query.trim().is_empty() {
            return Err(RagError::Validation("query must not be empty".to_string()));
        }
        if self.top_k == Some(0) {
            return Err(RagError::Validation(
                "topK must be a positive integer".to_string(),
            ));
        }
        if self.web_search_results == Some(0) {
            return Err(RagError::Validation(
                "webSearchResults must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}

/// The answer returned by `POST /api/rag/query`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub answer: String,
    pub web_search_used: bool,
    pub sources_count: usize,
    /// Previews of the context items given to the model.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
}

/// A truncated view of one context item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Source {
    pub content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl From<&Document> for Source {
    fn from(doc: &Document) -> Self {
        let content = if doc.content.chars().count() > SOURCE_PREVIEW_CHARS {
            let preview: String = doc.content.chars().take(SOURCE_PREVIEW_CHARS).collect();
            format!("{preview}...")
        } else {
            doc.content.clone()
        };
        Self {
            content,
            metadata: doc.metadata.clone(),
        }
    }
}

/// A piece of text with free-form metadata, as stored in the vector store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Document {
    /// Creates a document with a fresh random id and no metadata.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    /// The `source` metadata entry, if it is a string.
    pub fn source(&self) -> Option<&str> {
        self.metadata.get("source").and_then(Value::as_str)
    }
}

/// A single hit returned by a web-search provider.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct WebSearchResult {
    pub title: String,
    pub url: String,
    pub content: String,
}

impl From<WebSearchResult> for Document {
    fn from(result: WebSearchResult) -> Self {
        let content = if result.title.is_empty() {
            result.content
        } else {
            format!("{}\n{}", result.title, result.content)
        };
        Document::new(content)
            .with_metadata("source", result.url)
            .with_metadata("title", result.title)
            .with_metadata("origin", "web")
    }
}
