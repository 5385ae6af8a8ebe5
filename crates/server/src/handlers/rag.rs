//! # RAG Handlers
//!
//! `POST /api/rag/query` answers a question; `POST /api/rag/ingest` loads the
//! configured Markdown folder into the vector store. Confluence spaces are
//! loaded through the same pipeline at startup.

use super::{AppError, AppState};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use noterag::{
    ingest::{ingest_documents, IngestionResult},
    QueryRequest, QueryResponse,
};
use noterag_confluence::{ConfluenceClient, ConfluenceReader, ConfluenceSettings};
use noterag_markdown::MarkdownFolderReader;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub message: String,
    pub ingested_documents: usize,
}

/// Answers a question using the knowledge base and, optionally, the web.
pub async fn query_handler(
    State(app_state): State<AppState>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Json<QueryResponse>, AppError> {
    let Json(request) = payload?;
    info!(
        use_web_search = request.use_web_search,
        top_k = ?request.top_k,
        "Received query: '{}'",
        request.query
    );
    let response = app_state.rag_client.answer(&request).await?;
    Ok(Json(response))
}

/// Reads the configured knowledge base folder into the vector store.
///
/// Shared by the ingestion endpoint and the start-up initializer.
pub async fn ingest_knowledgebase(app_state: &AppState) -> Result<IngestionResult, AppError> {
    let repository = app_state.document_repository.as_ref().ok_or_else(|| {
        AppError::Unavailable("No vector store is configured.".to_string())
    })?;
    let folder = &app_state.config.knowledgebase.folder;
    let reader =
        MarkdownFolderReader::new(folder.as_str()).map_err(|e| AppError::Internal(e.into()))?;
    Ok(ingest_documents(&reader, repository.as_ref()).await?)
}

/// Scrapes the configured Confluence spaces into the vector store.
pub async fn ingest_confluence(app_state: &AppState) -> Result<IngestionResult, AppError> {
    let repository = app_state.document_repository.as_ref().ok_or_else(|| {
        AppError::Unavailable("No vector store is configured.".to_string())
    })?;
    let confluence = app_state
        .config
        .confluence
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("Confluence is not configured.".to_string()))?;
    let settings = ConfluenceSettings {
        base_url: confluence.base_url.clone(),
        token: confluence.token.clone(),
        email: confluence.email.clone(),
        page_limit: confluence.page_limit,
        timeout: Some(Duration::from_secs(confluence.timeout_secs)),
    };
    let client = ConfluenceClient::new(&settings).map_err(|e| AppError::Internal(e.into()))?;
    let reader = ConfluenceReader::new(client, confluence.spaces.clone());
    Ok(ingest_documents(&reader, repository.as_ref()).await?)
}

/// The handler for `POST /api/rag/ingest`.
pub async fn ingest_handler(
    State(app_state): State<AppState>,
) -> Result<Json<IngestResponse>, AppError> {
    let result = ingest_knowledgebase(&app_state).await?;
    Ok(Json(IngestResponse {
        message: format!(
            "Ingested {} documents from '{}'",
            result.documents_added, result.source
        ),
        ingested_documents: result.documents_added,
    }))
}
