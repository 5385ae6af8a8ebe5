//! # Ingestion Logic
//!
//! Loads documents from a `DocumentReader` into a `DocumentRepository` so that
//! they can be retrieved as context for later questions.

pub mod text;
pub mod traits;

pub use text::{chunk_text, chunk_text_with, ChunkError};
pub use traits::{DocumentReader, IngestError, IngestionResult};

use crate::providers::db::DocumentRepository;
use tracing::{info, warn};

/// Reads all documents from `reader` and stores them in `repository`.
///
/// An empty source is not an error: it is logged and reported as zero
/// documents added.
pub async fn ingest_documents(
    reader: &dyn DocumentReader,
    repository: &dyn DocumentRepository,
) -> Result<IngestionResult, IngestError> {
    let source = reader.source();
    info!("Starting document ingestion from '{source}'");

    let documents = reader.read_documents().await?;
    if documents.is_empty() {
        warn!("No documents found to ingest from '{source}'");
        return Ok(IngestionResult {
            source,
            ..Default::default()
        });
    }

    let document_ids: Vec<String> = documents.iter().map(|d| d.id.clone()).collect();
    let documents_added = repository.add_documents(documents).await?;
    info!(
        "Ingested {documents_added} documents from '{source}' into {}",
        repository.name()
    );

    Ok(IngestionResult {
        source,
        documents_added,
        document_ids,
    })
}
