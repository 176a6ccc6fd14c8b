//! Reviewlens Gateway
//!
//! JSON HTTP surface over the aggregation layer: explain, search, EDA
//! aspects and the dashboard overview, backed by the upstream model
//! service and a rolling observation window.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod journal;

use config::GatewayConfig;
use handlers::{create_router, AppState};
use journal::ObservationLog;
use reviewlens_model::HttpBackend;
use reviewlens_pipeline::Orchestrator;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tracing::info;

/// Gateway error
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Start the Gateway HTTP server
///
/// Initializes the upstream backend and the observation journal, then
/// serves the axum router until shutdown.
pub async fn start_server(config: GatewayConfig) -> Result<(), GatewayError> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Reviewlens Gateway");
    info!("Bind address: {}", config.bind_addr());
    info!("Upstream model service: {}", config.upstream_base_url);
    info!("Per-call timeout: {} ms", config.call_timeout_ms);
    info!("Observation window: {} reviews", config.journal_capacity);

    let backend = HttpBackend::new(&config.upstream_base_url);
    let orchestrator = Arc::new(Orchestrator::new(backend, config.pipeline()));
    let journal = Arc::new(Mutex::new(ObservationLog::new(config.journal_capacity)));

    let state = AppState {
        orchestrator,
        journal,
        top_aspects: config.top_aspects,
    };

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Gateway listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .await
        .map_err(|e| GatewayError::Server(e.to_string()))?;

    Ok(())
}
