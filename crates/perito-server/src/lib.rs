//! PeritoAI Server
//!
//! HTTP API over the retrieval engine and report generator, plus the
//! messaging webhook.

#![warn(missing_docs)]

pub mod bootstrap;
pub mod config;
pub mod handlers;
pub mod webhook;

use handlers::{create_router, AppState};
use perito_rag::PeritoConfig;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] perito_rag::ConfigError),

    /// Index could not be opened
    #[error("Store error: {0}")]
    Store(#[from] perito_store::StoreError),

    /// Provider could not be created
    #[error("Provider error: {0}")]
    Provider(#[from] perito_llm::LlmError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the engine and generator
///
/// Failures are logged and leave the component unset: the server still
/// starts and reports `engine_initialized: false`.
pub async fn initialize_state(config: PeritoConfig) -> AppState {
    let build_config = config.clone();
    let built = tokio::task::spawn_blocking(move || {
        let engine = bootstrap::build_engine(&build_config)
            .map_err(|e| error!(error = %e, "Error initializing engine"))
            .ok();
        let generator = bootstrap::build_generator(&build_config)
            .map_err(|e| error!(error = %e, "Error initializing report generator"))
            .ok();
        (engine, generator)
    })
    .await;

    match built {
        Ok((engine, generator)) => AppState::new(engine, generator, config),
        Err(e) => {
            error!(error = %e, "Initialization task failed");
            AppState::new(None, None, config)
        }
    }
}

/// Start the HTTP server
///
/// Initializes the engine and generator, then serves until shutdown.
pub async fn start_server(config: PeritoConfig) -> Result<(), ServerError> {
    info!("Starting PeritoAI server");
    info!("Bind address: {}", config.server.bind_addr());
    info!("Index: {}", config.paths.index_path.display());

    let bind_addr = config.server.bind_addr();
    let state = initialize_state(config).await;
    if state.is_initialized() {
        info!("RAG engine and generator initialized successfully");
    }

    let app = create_router(state);

    let listener = TcpListener::bind(&bind_addr).await?;
    info!("Server listening on {}", bind_addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
