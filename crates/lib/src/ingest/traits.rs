use crate::{errors::RagError, types::Document};
use async_trait::async_trait;
use thiserror::Error;

/// A generic error type for all document readers.
///
/// Each reader maps its specific failures into these variants so ingestion
/// errors can be handled uniformly.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("The specified source could not be found: {0}")]
    SourceNotFound(String),

    #[error("Failed to read content from the source: {0}")]
    Fetch(String),

    #[error("Failed to parse the content from the source: {0}")]
    Parse(String),

    #[error("Failed to store documents: {0}")]
    Store(#[from] RagError),
}

/// Summary of one ingestion run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestionResult {
    /// The source that was processed (e.g. a folder path).
    pub source: String,
    /// The number of documents written to the repository.
    pub documents_added: usize,
    pub document_ids: Vec<String>,
}

/// A source of documents to be loaded into the vector store.
#[async_trait]
pub trait DocumentReader: Send + Sync {
    /// A human-readable identifier for the source, used in logs and results.
    fn source(&self) -> String;

    /// Reads every document the source provides.
    async fn read_documents(&self) -> Result<Vec<Document>, IngestError>;
}
