//! Server lifecycle: open storage, bind, serve until Ctrl+C.

use crate::config::ApiConfig;
use crate::gate::GateError;
use crate::router::build_router;
use crate::state::AppState;
use crate::store::{Store, StoreError};
use log::{info, warn};
use tokio::net::TcpListener;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to open storage: {0}")]
    Store(#[from] StoreError),
    #[error("invalid token configuration: {0}")]
    Gate(#[from] GateError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Runs the HTTP server until a shutdown signal arrives.
pub async fn serve(config: ApiConfig) -> Result<(), ServerError> {
    let store = Store::open(&config.db_path, config.max_connections)?;
    let gate = config.identity_gate()?;
    if gate.is_none() {
        warn!(
            "event=server_start module=api status=degraded error_code=jwt_secret_missing"
        );
    }

    let app = build_router(AppState::new(store, gate), &config);
    let listener = TcpListener::bind(config.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind,
            source,
        })?;
    info!(
        "event=server_start module=api status=ok addr={} allowed_origin={}",
        config.bind, config.allowed_origin
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("event=server_stop module=api status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=shutdown_signal module=api status=error error={err}");
    }
}
