//! Spontaneity Server
//!
//! HTTP front end for the recommendation engine: JWT bearer sessions,
//! recommendation generation through the trust pipeline and partner-scoped
//! audit log retrieval.

#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod pipeline;
pub mod session;

use config::{build_adapters, ServerConfig};
use handlers::{create_router, AppState};
use session::SessionManager;
use spontaneity_audit::{AuditError, AuditRecorder, RetentionWorker, SqliteAuditStore};
use spontaneity_engine::SpontaneityEngine;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{info, warn};

/// Server error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Audit store could not be opened
    #[error("Audit store error: {0}")]
    Audit(#[from] AuditError),

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Build the shared state: adapters, engine, audit store and sessions
pub fn build_state(config: &ServerConfig) -> Result<AppState, ServerError> {
    let adapters = build_adapters(&config.providers)?;
    if adapters.is_empty() {
        warn!("No providers configured; every recommendation request will fail");
    }

    let engine = Arc::new(SpontaneityEngine::new(adapters, config.engine.clone()));
    let store = Arc::new(SqliteAuditStore::new(&config.audit_db_path)?);

    Ok(AppState {
        session_manager: Arc::new(SessionManager::new(
            &config.jwt_secret,
            config.token_expiry_secs,
        )),
        engine,
        audit: AuditRecorder::new(store),
        features: config.features,
    })
}

/// Start the HTTP server
///
/// Builds the application state, spawns the retention worker and serves until
/// Ctrl-C.
pub async fn start_server(config: ServerConfig) -> Result<(), ServerError> {
    info!("Starting Spontaneity server");
    info!("Bind address: {}", config.bind_addr());
    info!("Token expiry: {} seconds", config.token_expiry_secs);
    info!("Audit database: {}", config.audit_db_path);

    let state = build_state(&config)?;
    info!(
        "Providers (priority order): {:?}",
        state.engine.adapter_names()
    );

    let (stop_retention, retention_stopped) = oneshot::channel::<()>();
    let store = Arc::clone(state.audit.store());
    let mut worker = RetentionWorker::new(config.retention.clone());
    let retention = tokio::spawn(async move {
        worker
            .run_until(store, async {
                let _ = retention_stopped.await;
            })
            .await;
    });

    let app = create_router(state);

    // Bind and serve
    let listener = TcpListener::bind(&config.bind_addr()).await?;
    info!("Server listening on {}", config.bind_addr());

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Server(e.to_string()));

    let _ = stop_retention.send(());
    if let Err(e) = retention.await {
        warn!("Retention worker ended abnormally: {}", e);
    }

    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
