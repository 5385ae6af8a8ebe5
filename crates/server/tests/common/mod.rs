//! # Common Test Utilities
//!
//! `TestApp` spawns a real `noterag-server` on a random port. It can be built
//! either from a YAML config pointing the chat provider at an `httpmock`
//! server, or from a hand-assembled `AppState` using in-memory mocks.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use httpmock::MockServer;
use noterag::{
    providers::{ai::AiProvider, db::DocumentRepository, web::WebSearchProvider},
    RagClientBuilder,
};
use noterag_server::{
    config::{self, AppConfig, KnowledgebaseConfig},
    router,
    state::{build_app_state, AppState},
};
use reqwest::Client;
use std::{fs::File, io::Write, net::SocketAddr, sync::Arc};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

// --- Full Application Test Harness ---

pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub app_state: AppState,
    _config_dir: Option<TempDir>,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the server from a config file whose chat provider is the
    /// OpenAI-compatible endpoint of `mock_server`. No vector store or web
    /// search is configured.
    pub async fn spawn() -> Result<Self> {
        let mock_server = MockServer::start_async().await;

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
ai:
  provider: "local"
  api_url: "{}"
  model_name: "mock-chat-model"
  timeout_secs: 5
"#,
            mock_server.url("/v1/chat/completions")
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = config::get_config(Some(config_path.to_str().unwrap()))?;
        let app_state = build_app_state(config).await?;

        let mut app = TestApp::spawn_with_state(app_state, mock_server).await?;
        app._config_dir = Some(config_dir);
        Ok(app)
    }

    pub async fn spawn_with_state(app_state: AppState, mock_server: MockServer) -> Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            app_state: app_state_for_harness,
            _config_dir: None,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// POSTs a JSON value to `/api/rag/query`.
    pub async fn post_query(&self, body: &serde_json::Value) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}/api/rag/query", self.address))
            .json(body)
            .send()
            .await?)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

// --- State Builder ---

/// Assembles an `AppState` around in-memory providers.
pub fn mock_state(
    ai: impl AiProvider + 'static,
    repository: Option<Arc<dyn DocumentRepository>>,
    web: Option<Box<dyn WebSearchProvider>>,
    knowledgebase_folder: &str,
) -> AppState {
    let mut builder = RagClientBuilder::new().ai_provider(Box::new(ai));
    if let Some(repository) = &repository {
        builder = builder.document_repository(repository.clone());
    }
    if let Some(web) = web {
        builder = builder.web_search(web);
    }
    let config = AppConfig {
        port: 0,
        ai: noterag::providers::factory::ProviderConfig {
            provider: "mock".to_string(),
            api_url: None,
            api_key: None,
            model_name: "mock".to_string(),
            temperature: 0.3,
            timeout_secs: 5,
        },
        embedding: None,
        vector_store: None,
        web_search: None,
        rag: Default::default(),
        knowledgebase: KnowledgebaseConfig {
            init: false,
            folder: knowledgebase_folder.to_string(),
        },
        confluence: None,
    };
    AppState {
        config: Arc::new(config),
        rag_client: Arc::new(builder.build().expect("mock state always has an AI provider")),
        document_repository: repository,
    }
}
