use crate::{errors::RagError, types::Document};
use async_trait::async_trait;
use std::fmt::Debug;

/// A trait for a store of embedded documents that supports similarity search.
#[async_trait]
pub trait DocumentRepository: Send + Sync + Debug {
    /// Returns the name of the backing store (e.g., "Qdrant").
    fn name(&self) -> &str;

    /// Embeds and stores documents. Returns the number of documents written.
    async fn add_documents(&self, documents: Vec<Document>) -> Result<usize, RagError>;

    /// Returns at most `top_k` documents most similar to `query`, best first.
    async fn find_similar(&self, query: &str, top_k: usize) -> Result<Vec<Document>, RagError>;
}
