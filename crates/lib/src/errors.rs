use thiserror::Error;

/// Custom error types for the RAG pipeline.
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("Vector store error: {0}")]
    VectorStore(String),
    #[error("Web search failed: {0}")]
    WebSearch(String),
    #[error("Invalid request: {0}")]
    Validation(String),
    #[error("AI provider is missing")]
    MissingAiProvider,
}

impl RagError {
    /// Returns `true` when the failure was caused by an upstream collaborator
    /// (LLM runtime, vector store or web-search provider).
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            RagError::AiRequest(_)
                | RagError::AiDeserialization(_)
                | RagError::AiApi(_)
                | RagError::VectorStore(_)
                | RagError::WebSearch(_)
        )
    }
}
