//! # Qdrant Document Repository
//!
//! Stores documents in a Qdrant collection. Text is embedded through an
//! `EmbeddingClient`; the payload of each point holds the document content
//! under `content` plus every metadata entry as a top-level key.

use crate::{
    errors::RagError,
    providers::{ai::EmbeddingClient, db::storage::DocumentRepository},
    types::Document,
};
use async_trait::async_trait;
use futures::{stream, StreamExt, TryStreamExt};
use qdrant_client::{
    qdrant::{
        point_id::PointIdOptions, CreateCollectionBuilder, Distance, PointId, PointStruct,
        ScoredPoint, SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
    },
    Payload, Qdrant,
};
use serde_json::{Map, Value};
use std::fmt;
use tracing::{debug, info, warn};

const CONTENT_KEY: &str = "content";
/// Embedding requests kept in flight while indexing a batch.
const EMBED_CONCURRENCY: usize = 4;

/// Connection settings for a Qdrant collection.
#[derive(Clone, Debug)]
pub struct QdrantSettings {
    pub url: String,
    pub collection: String,
    pub api_key: Option<String>,
}

pub struct QdrantRepository {
    client: Qdrant,
    collection: String,
    embedder: EmbeddingClient,
}

impl fmt::Debug for QdrantRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QdrantRepository")
            .field("collection", &self.collection)
            .field("embedder", &self.embedder)
            .finish()
    }
}

impl QdrantRepository {
    pub fn new(settings: &QdrantSettings, embedder: EmbeddingClient) -> Result<Self, RagError> {
        let mut builder = Qdrant::from_url(&settings.url);
        if let Some(key) = &settings.api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| RagError::VectorStore(e.to_string()))?;
        Ok(Self {
            client,
            collection: settings.collection.clone(),
            embedder,
        })
    }

    async fn collection_exists(&self) -> Result<bool, RagError> {
        self.client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| RagError::VectorStore(e.to_string()))
    }

    /// Creates the collection with cosine distance if it does not exist yet.
    async fn ensure_collection(&self, vector_size: u64) -> Result<(), RagError> {
        if self.collection_exists().await? {
            debug!("Collection '{}' already exists", self.collection);
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(vector_size, Distance::Cosine)),
            )
            .await
            .map_err(|e| RagError::VectorStore(e.to_string()))?;
        info!(
            "Created collection '{}' (size={vector_size}, distance=cosine)",
            self.collection
        );
        Ok(())
    }
}

#[async_trait]
impl DocumentRepository for QdrantRepository {
    fn name(&self) -> &str {
        "Qdrant"
    }

    async fn add_documents(&self, documents: Vec<Document>) -> Result<usize, RagError> {
        if documents.is_empty() {
            return Ok(0);
        }

        let embedded: Vec<(Document, Vec<f32>)> = stream::iter(documents)
            .map(|doc| async move {
                let vector = self.embedder.embed(&doc.content).await?;
                Ok::<_, RagError>((doc, vector))
            })
            .buffered(EMBED_CONCURRENCY)
            .try_collect()
            .await?;

        if let Some((_, vector)) = embedded.first() {
            self.ensure_collection(vector.len() as u64).await?;
        }

        let points = embedded
            .into_iter()
            .map(|(doc, vector)| {
                let payload = document_to_payload(&doc)?;
                Ok(PointStruct::new(doc.id, vector, payload))
            })
            .collect::<Result<Vec<_>, RagError>>()?;

        let count = points.len();
        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(|e| RagError::VectorStore(e.to_string()))?;
        info!("Upserted {count} documents into '{}'", self.collection);
        Ok(count)
    }

    async fn find_similar(&self, query: &str, top_k: usize) -> Result<Vec<Document>, RagError> {
        // Nothing has been ingested yet.
        if !self.collection_exists().await? {
            warn!("Collection '{}' does not exist; no notes to search", self.collection);
            return Ok(Vec::new());
        }

        let vector = self.embedder.embed(query).await?;
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, vector, top_k as u64).with_payload(true),
            )
            .await
            .map_err(|e| RagError::VectorStore(e.to_string()))?;

        debug!("Qdrant returned {} hits", response.result.len());
        Ok(response
            .result
            .into_iter()
            .map(scored_point_to_document)
            .collect())
    }
}

/// Rebuilds a `Document` from a search hit: `content` comes out of the
/// payload and every other key becomes metadata. A missing or non-string
/// `content` yields empty content.
fn scored_point_to_document(point: ScoredPoint) -> Document {
    let id = point_id_to_string(point.id.as_ref());
    let mut metadata: Map<String, Value> = point
        .payload
        .into_iter()
        .map(|(k, v)| (k, v.into_json()))
        .collect();
    let content = match metadata.remove(CONTENT_KEY) {
        Some(Value::String(s)) => s,
        _ => String::new(),
    };
    Document {
        id,
        content,
        metadata,
    }
}

fn document_to_payload(doc: &Document) -> Result<Payload, RagError> {
    let mut map = doc.metadata.clone();
    map.insert(CONTENT_KEY.to_string(), Value::String(doc.content.clone()));
    Payload::try_from(Value::Object(map)).map_err(|e| RagError::VectorStore(e.to_string()))
}

fn point_id_to_string(id: Option<&PointId>) -> String {
    match id.and_then(|pid| pid.point_id_options.as_ref()) {
        Some(PointIdOptions::Uuid(u)) => u.clone(),
        Some(PointIdOptions::Num(n)) => n.to_string(),
        None => String::new(),
    }
}
