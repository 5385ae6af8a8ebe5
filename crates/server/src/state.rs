//! # Application State
//!
//! The shared application state (`AppState`) and the logic for building it at
//! startup. Provider clients are created once here and shared by every request.

use crate::config::AppConfig;
use anyhow::Context;
use noterag::{
    providers::{
        ai::EmbeddingClient,
        db::{
            qdrant::{QdrantRepository, QdrantSettings},
            DocumentRepository,
        },
        factory::{create_ai_provider, create_web_search_provider},
    },
    RagClient, RagClientBuilder,
};
use std::sync::Arc;
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The application's configuration, loaded from `config.yml`.
    pub config: Arc<AppConfig>,
    /// The question-answering pipeline.
    pub rag_client: Arc<RagClient>,
    /// The knowledge base, also used by the ingestion endpoint.
    pub document_repository: Option<Arc<dyn DocumentRepository>>,
}

/// Builds the shared application state from the configuration.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let ai_provider =
        create_ai_provider(&config.ai).context("failed to configure the AI provider")?;

    let document_repository: Option<Arc<dyn DocumentRepository>> = match &config.vector_store {
        Some(store) => {
            let embedding = config.embedding.as_ref().ok_or_else(|| {
                anyhow::anyhow!("`embedding` must be configured when `vector_store` is set")
            })?;
            let embedder = EmbeddingClient::new(
                embedding.api_url.clone(),
                embedding.model_name.clone(),
                embedding.api_key.clone(),
            )?;
            let settings = QdrantSettings {
                url: store.url.clone(),
                collection: store.collection.clone(),
                api_key: store.api_key.clone(),
            };
            info!("Using Qdrant collection '{}' at {}", store.collection, store.url);
            Some(Arc::new(QdrantRepository::new(&settings, embedder)?))
        }
        None => {
            info!("No vector store configured; answers will not use the knowledge base.");
            None
        }
    };

    let mut builder = RagClientBuilder::new()
        .ai_provider(ai_provider)
        .defaults(config.rag);
    if let Some(repository) = &document_repository {
        builder = builder.document_repository(repository.clone());
    }
    if let Some(web) = &config.web_search {
        info!("Web search enabled via '{}'", web.provider);
        builder = builder.web_search(
            create_web_search_provider(web).context("failed to configure web search")?,
        );
    }

    Ok(AppState {
        config: Arc::new(config),
        rag_client: Arc::new(builder.build()?),
        document_repository,
    })
}
