//! HTTP server lifecycle.
//!
//! [`start_server`] binds the configured address, serves the evacuation API,
//! and drains in-flight requests on `Ctrl-C`.

use std::sync::Arc;

use safeescape_planner::{AdvisoryAugmenter, GeoProvider};
use tokio::net::TcpListener;
use tracing::info;

use crate::router::build_router;
use crate::state::AppState;

/// Bind address for the API server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host name or IP address (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8080,
        }
    }
}

/// Errors that stop the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The address could not be resolved or bound.
    #[error("cannot bind {addr}: {source}")]
    Bind {
        /// The `host:port` that was requested.
        addr: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A fatal I/O error while accepting connections.
    #[error("server stopped: {0}")]
    Serve(#[source] std::io::Error),
}

/// Serve the evacuation API until `Ctrl-C`.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the address cannot be bound and
/// [`ServerError::Serve`] on a fatal I/O error while serving.
pub async fn start_server<G, A>(
    config: &ServerConfig,
    state: Arc<AppState<G, A>>,
) -> Result<(), ServerError>
where
    G: GeoProvider + 'static,
    A: AdvisoryAugmenter + 'static,
{
    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|source| ServerError::Bind {
            addr: format!("{}:{}", config.host, config.port),
            source,
        })?;

    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "evacuation API listening");
    }

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    info!("evacuation API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; serve until the process is killed.
        std::future::pending::<()>().await;
    }
}
