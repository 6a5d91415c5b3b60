//! Main HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use sheetbot_commands::LookupDispatcher;

use crate::{health_api, landing, webhook};

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    /// Token the platform must echo during the subscription handshake.
    pub verify_token: Arc<str>,
    pub webhook_path: Arc<str>,
    pub dispatcher: Arc<LookupDispatcher>,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(
        verify_token: impl Into<Arc<str>>,
        webhook_path: impl Into<Arc<str>>,
        dispatcher: Arc<LookupDispatcher>,
    ) -> Self {
        Self {
            verify_token: verify_token.into(),
            webhook_path: webhook_path.into(),
            dispatcher,
            started_at: Instant::now(),
        }
    }
}

/// Build the router: landing page, health check, and the webhook pair.
pub fn build_router(state: GatewayState) -> Router {
    let webhook_path = state.webhook_path.clone();
    Router::new()
        .route("/", get(landing::index))
        .route("/api/health", get(health_api::get_health))
        .route(
            &webhook_path,
            get(webhook::verify).post(webhook::receive),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C or SIGTERM.
#[instrument(skip(state))]
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let webhook_path = state.webhook_path.clone();
    let app = build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, webhook = %webhook_path, "Gateway HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
