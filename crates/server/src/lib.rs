pub mod config;
pub mod errors;
pub mod handlers;
pub mod router;
pub mod state;

use crate::{
    config::{get_config, AppConfig},
    handlers::{ingest_confluence, ingest_knowledgebase},
    router::create_router,
    state::{build_app_state, AppState},
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

/// Loads the configured knowledge base when `knowledgebase.init` is set.
///
/// Failures are logged and do not prevent the server from starting.
pub async fn initialize_knowledgebase(app_state: &AppState) {
    if !app_state.config.knowledgebase.init {
        return;
    }
    info!(
        "Initializing knowledge base from '{}'",
        app_state.config.knowledgebase.folder
    );
    match ingest_knowledgebase(app_state).await {
        Ok(result) => info!(
            "Knowledge base initialized with {} documents",
            result.documents_added
        ),
        Err(e) => error!("Knowledge base initialization failed: {e:?}"),
    }
}

/// Scrapes the configured Confluence spaces when `confluence.scrap` is set.
///
/// Failures are logged and do not prevent the server from starting.
pub async fn initialize_confluence(app_state: &AppState) {
    let Some(confluence) = &app_state.config.confluence else {
        return;
    };
    if !confluence.scrap {
        return;
    }
    info!("Confluence scraping enabled for {}", confluence.base_url);
    match ingest_confluence(app_state).await {
        Ok(result) => info!(
            "Confluence content ingested: {} document chunks from '{}'",
            result.documents_added, result.source
        ),
        Err(e) => error!("Confluence scraping failed: {e:?}"),
    }
}

/// Configures and runs the web server.
///
/// This function initializes the application state, loads the knowledge base
/// if requested, creates the router and starts the Axum server.
pub async fn run(listener: TcpListener, config: AppConfig) -> anyhow::Result<()> {
    debug!(?config, "Server configuration loaded");

    let app_state = build_app_state(config).await?;
    initialize_knowledgebase(&app_state).await;
    initialize_confluence(&app_state).await;
    let app = create_router(app_state);

    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

/// The library's main entry point.
///
/// Sets up logging, configuration, and the TCP listener, then calls `run`.
pub async fn start() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = get_config(None)?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    run(listener, config).await
}
