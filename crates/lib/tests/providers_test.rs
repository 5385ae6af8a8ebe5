//! # Provider Tests
//!
//! Verifies the HTTP clients for chat models, embeddings and web search against
//! an `httpmock` server standing in for Ollama, OpenAI-compatible runtimes,
//! Tavily and SearXNG.

use anyhow::Result;
use httpmock::prelude::*;
use noterag::{
    providers::{
        ai::{local::LocalAiProvider, ollama::OllamaProvider, AiProvider, EmbeddingClient},
        factory::{create_ai_provider, create_web_search_provider, ProviderConfig, WebSearchConfig},
        web::{SearxngProvider, TavilyProvider, WebSearchProvider},
    },
    RagError,
};
use serde_json::json;

#[tokio::test]
async fn test_ollama_provider_sends_native_chat_request() -> Result<()> {
    // --- 1. Arrange ---
    let server = MockServer::start_async().await;
    let chat_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat").json_body(json!({
                "model": "llama3.2",
                "messages": [
                    {"role": "system", "content": "system text"},
                    {"role": "user", "content": "user text"}
                ],
                "stream": false,
                "options": {"temperature": 0.3}
            }));
            then.status(200).json_body(json!({
                "model": "llama3.2",
                "message": {"role": "assistant", "content": "Hello from Ollama"},
                "done": true
            }));
        })
        .await;
    let provider = OllamaProvider::new(&server.base_url(), "llama3.2", 0.3, None)?;

    // --- 2. Act ---
    let answer = provider.generate("system text", "user text").await?;

    // --- 3. Assert ---
    chat_mock.assert_async().await;
    assert_eq!(answer, "Hello from Ollama");
    Ok(())
}

#[tokio::test]
async fn test_ollama_provider_maps_error_status() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/chat");
            then.status(404).body("model 'missing' not found");
        })
        .await;
    let provider = OllamaProvider::new(&server.base_url(), "missing", 0.3, None)?;

    let err = provider.generate("s", "u").await.unwrap_err();

    match err {
        RagError::AiApi(message) => {
            assert!(message.contains("404"));
            assert!(message.contains("model 'missing' not found"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn test_ollama_provider_unreachable_is_request_error() -> Result<()> {
    // Nothing listens on port 9 (discard) in the test environment.
    let provider = OllamaProvider::new("http://127.0.0.1:9", "llama3.2", 0.3, None)?;
    let err = provider.generate("s", "u").await.unwrap_err();
    assert!(matches!(err, RagError::AiRequest(_)));
    assert!(err.is_upstream());
    Ok(())
}

#[tokio::test]
async fn test_local_provider_uses_bearer_auth_and_first_choice() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer secret");
            then.status(200).json_body(json!({
                "choices": [{"message": {"role": "assistant", "content": "first"}}]
            }));
        })
        .await;
    let provider = LocalAiProvider::new(
        server.url("/v1/chat/completions"),
        Some("secret".to_string()),
        Some("mock-model".to_string()),
    )?;

    let answer = provider.generate("sys", "user").await?;

    mock.assert_async().await;
    assert_eq!(answer, "first");
    Ok(())
}

#[tokio::test]
async fn test_local_provider_rejects_empty_choices() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).json_body(json!({ "choices": [] }));
        })
        .await;
    let provider = LocalAiProvider::new(server.url("/v1/chat/completions"), None, None)?;

    let err = provider.generate("sys", "user").await.unwrap_err();

    assert!(matches!(err, RagError::AiApi(_)));
    Ok(())
}

#[tokio::test]
async fn test_embedding_client_returns_first_vector() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/embeddings")
                .json_body(json!({"model": "nomic-embed-text", "input": "hello"}));
            then.status(200)
                .json_body(json!({"data": [{"embedding": [0.1, 0.2, 0.3]}]}));
        })
        .await;
    let client = EmbeddingClient::new(server.url("/v1/embeddings"), "nomic-embed-text", None)?;

    let vector = client.embed("hello").await?;

    mock.assert_async().await;
    assert_eq!(vector, vec![0.1, 0.2, 0.3]);
    Ok(())
}

#[tokio::test]
async fn test_tavily_provider_truncates_results() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/search")
                .header("authorization", "Bearer tvly-key")
                .json_body_partial(r#"{"query": "rust async", "max_results": 2}"#);
            then.status(200).json_body(json!({
                "results": [
                    {"title": "A", "url": "https://a.example", "content": "a", "score": 0.9},
                    {"title": "B", "url": "https://b.example", "content": "b", "score": 0.8},
                    {"title": "C", "url": "https://c.example", "content": "c", "score": 0.7}
                ]
            }));
        })
        .await;
    let provider = TavilyProvider::new(Some(server.url("/search")), "tvly-key".to_string())?;

    let results = provider.search("rust async", 2).await?;

    mock.assert_async().await;
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].url, "https://a.example");
    assert_eq!(results[1].title, "B");
    Ok(())
}

#[tokio::test]
async fn test_searxng_provider_queries_json_format() -> Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("q", "axum router")
                .query_param("format", "json");
            then.status(200).json_body(json!({
                "results": [
                    {"title": "Axum", "url": "https://docs.rs/axum", "content": "Router docs"}
                ]
            }));
        })
        .await;
    let provider = SearxngProvider::new(&server.base_url())?;

    let results = provider.search("axum router", 5).await?;

    mock.assert_async().await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].content, "Router docs");
    Ok(())
}

#[tokio::test]
async fn test_web_search_error_status_is_web_search_error() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/search");
            then.status(503);
        })
        .await;
    let provider = SearxngProvider::new(&server.base_url())?;

    let err = provider.search("anything", 3).await.unwrap_err();

    assert!(matches!(err, RagError::WebSearch(_)));
    Ok(())
}

#[test]
fn test_factory_rejects_unknown_providers() {
    let config = ProviderConfig {
        provider: "gemini".to_string(),
        api_url: None,
        api_key: None,
        model_name: "x".to_string(),
        temperature: 0.3,
        timeout_secs: 10,
    };
    assert!(matches!(
        create_ai_provider(&config),
        Err(RagError::Validation(_))
    ));

    let web = WebSearchConfig {
        provider: "bing".to_string(),
        api_url: None,
        api_key: None,
    };
    assert!(matches!(
        create_web_search_provider(&web),
        Err(RagError::Validation(_))
    ));
}

#[test]
fn test_factory_requires_provider_specific_settings() {
    let local = ProviderConfig {
        provider: "local".to_string(),
        api_url: None,
        api_key: None,
        model_name: "x".to_string(),
        temperature: 0.3,
        timeout_secs: 10,
    };
    assert!(create_ai_provider(&local).is_err());

    let tavily = WebSearchConfig {
        provider: "tavily".to_string(),
        api_url: None,
        api_key: Some(String::new()),
    };
    assert!(create_web_search_provider(&tavily).is_err());

    let ollama = ProviderConfig {
        provider: "ollama".to_string(),
        ..local
    };
    assert!(create_ai_provider(&ollama).is_ok());
}
