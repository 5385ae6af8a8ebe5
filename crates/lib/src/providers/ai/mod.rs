pub mod embedding;
pub mod local;
pub mod ollama;

use crate::errors::RagError;
use async_trait::async_trait;
use dyn_clone::DynClone;
pub use embedding::EmbeddingClient;
use std::fmt::Debug;

/// A trait for interacting with a chat-capable language model.
///
/// The RAG pipeline only needs one capability: turn a system prompt carrying
/// the retrieved context plus the user's question into an answer.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, RagError>;
}

dyn_clone::clone_trait_object!(AiProvider);
