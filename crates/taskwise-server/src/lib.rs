//! Taskwise Server
//!
//! HTTP front end for the task parser. Exposes `POST /api/ai/parse-todo`,
//! `POST /api/ai/analyze-todos` and `GET /health`.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;

use config::ServerConfig;
use handlers::{create_router, AppState};
use std::sync::Arc;
use std::time::Duration;
use taskwise_domain::Clock;
use taskwise_llm::GeminiProvider;
use taskwise_parser::{ErrorCode, TaskParser};
use tokio::net::TcpListener;
use tracing::info;

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("CONFIG_ERROR: {0}")]
    Config(#[from] config::ConfigError),

    /// The extractor could not be set up
    #[error("CONFIG_ERROR: failed to initialize LLM provider: {0}")]
    Provider(String),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

impl ServerError {
    /// Code reported for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            ServerError::Config(_) | ServerError::Provider(_) => ErrorCode::ConfigError,
            ServerError::Bind(_) | ServerError::Server(_) => ErrorCode::UnknownError,
        }
    }
}

/// Build the application state for a validated configuration
pub fn build_state(config: &ServerConfig) -> Result<AppState<GeminiProvider>, ServerError> {
    config.validate()?;

    let provider = GeminiProvider::with_timeout(
        config.llm.endpoint.as_str(),
        config.llm.model.as_str(),
        config.llm.api_key.as_str(),
        Duration::from_secs(config.llm.timeout_secs),
    )
    .map_err(|e| ServerError::Provider(e.to_string()))?;

    let parser = TaskParser::new(provider, config.parser.clone())
        .map_err(|e| ServerError::Provider(e.to_string()))?;

    Ok(AppState {
        parser: Arc::new(parser),
        clock: Clock::system(config.utc_offset_hours),
    })
}

/// Start the HTTP server
///
/// Validates configuration, builds the Gemini-backed parser and starts the
/// axum server. Fails before binding if the configuration is unusable.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    let state = build_state(&config)?;

    info!("Starting Taskwise server");
    info!("Bind address: {}", config.bind_addr());
    info!("Model: {}", config.llm.model);
    info!(
        "Classification: {}, extraction timeout: {}s, UTC offset: {:+}h",
        config.parser.classification.as_str(),
        config.parser.extraction_timeout_secs,
        config.utc_offset_hours
    );

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| ServerError::Server(e.to_string()))?;

    Ok(())
}
