//! Server assembly: store selection, router, listener.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::config::{ServerConfig, StorageKind};
use crate::http::{AppState, build_router};
use crate::service::GameService;
use crate::store::{GameStore, MemoryStore, SqliteStore, StoreError};

/// Builds the store selected by `config`.
///
/// # Errors
///
/// Returns [`StoreError`] if the SQLite database cannot be opened.
#[instrument(skip(config), fields(storage = %config.storage()))]
pub fn build_store(config: &ServerConfig) -> Result<Arc<dyn GameStore>, StoreError> {
    let store: Arc<dyn GameStore> = match config.storage() {
        StorageKind::Memory => {
            warn!("Using in-memory storage; games are lost on restart");
            Arc::new(MemoryStore::new())
        }
        StorageKind::Sqlite => Arc::new(SqliteStore::open(config.database_path())?),
    };
    Ok(store)
}

/// Runs the HTTP server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the store cannot be built, the address cannot be
/// bound, or the server fails.
#[instrument(skip(config), fields(addr = %config.bind_address()))]
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let store = build_store(&config)?;
    let service = GameService::new(store);
    let app = build_router(AppState::new(service), config.request_timeout());

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    info!(addr = %listener.local_addr()?, "Server ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
