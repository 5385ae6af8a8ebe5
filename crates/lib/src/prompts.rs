//! Prompt templates used when asking the model to answer from retrieved context.

/// The system prompt for answering a question from retrieved context.
/// `{context}` is replaced with the joined context items.
pub const RAG_SYSTEM_PROMPT: &str = "You are an AI assistant that helps answer questions based on the provided context. Use the following pieces of context to answer the question at the end. If you don't know the answer, just say that you don't know, don't try to make up an answer.\n\nContext:\n{context}\n\nAnswer the question in a comprehensive and informative way.";

/// Placed into the prompt when neither the vector store nor the web returned anything.
pub const NO_CONTEXT_FOUND: &str = "No relevant information found.";

/// Renders the system prompt for a given context block.
pub fn build_rag_system_prompt(context: &str) -> String {
    RAG_SYSTEM_PROMPT.replace("{context}", context)
}
