//! Live HTTP server for the viewer.
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | GET | / | Index page (HTML) |
//! | GET | /context/{id}/ | Detail page (HTML), 404/500 as text |
//! | GET | /context/{id}/json/ | Raw record (JSON), 404/500 as text |
//!
//! Paths without the trailing slash answer with a 308 redirect to the slashed
//! form, since the detail page's links are relative to its directory.
//! `/context/{id}/json/index.json` serves the JSON export so the detail
//! page's link works both live and in the static build.

mod handlers;

pub use handlers::{AppState, INTERNAL_ERROR_BODY, NOT_FOUND_BODY, RouteError};

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::ViewerConfig;
use crate::store::RecordStore;

/// Create the router with all routes configured.
///
/// This is separated from [`start_server`] to enable testing without a socket.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/context/{id}", get(handlers::context_detail_redirect))
        .route("/context/{id}/", get(handlers::context_detail))
        .route("/context/{id}/json", get(handlers::context_json_redirect))
        .route("/context/{id}/json/", get(handlers::context_json))
        .route("/context/{id}/json/index.json", get(handlers::context_json))
        .with_state(state)
}

/// A server accepting connections on a background task
pub struct RunningServer {
    pub addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl RunningServer {
    /// Token that stops the server when cancelled
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Stop accepting connections and wait for in-flight requests to finish
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(e) = self.task.await {
            error!("Server task failed: {}", e);
        }
    }
}

/// Bind the listener and start serving on a background task.
///
/// Use port 0 in `config` to bind a random free port; the bound address is
/// returned in [`RunningServer::addr`].
pub async fn start_server(config: &ViewerConfig) -> Result<RunningServer> {
    let state = AppState::new(RecordStore::from_config(config));
    let app = create_router(state);

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    let addr = listener.local_addr().context("Failed to read bound address")?;

    info!(
        source = %config.source_path.display(),
        "Serving context windows on http://{}",
        addr
    );

    let shutdown = CancellationToken::new();
    let server_shutdown = shutdown.clone();
    let task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(server_shutdown.cancelled_owned())
            .await
        {
            error!("Server error: {}", e);
        }
        info!("HTTP server shutdown complete");
    });

    Ok(RunningServer { addr, shutdown, task })
}
