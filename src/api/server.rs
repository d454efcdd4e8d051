// src/api/server.rs
//! HTTP transport for the stats endpoint
//!
//! Serves JSON-RPC on `POST /` with a permissive CORS policy so browser
//! dashboards on other origins can poll it.

use crate::api::rpc::{RpcError, RpcRegistry};
use crate::stats::snapshot::StatsSource;
use crate::utils::error::MinerError;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use log::{debug, info};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

/// Method name of the legacy stats query
pub const STATS_METHOD: &str = "miner_getstat1";

/// Builds the method table backed by `source`
pub fn registry(source: Arc<StatsSource>) -> RpcRegistry {
    let mut registry = RpcRegistry::new();
    registry.register(STATS_METHOD, move |_params| {
        let stats = source.get_stats();
        debug!(
            "Stats query: {} shares accepted, {} H/s",
            stats.accepted,
            stats.hashrates.join(";")
        );
        serde_json::to_value(stats.res()).map_err(RpcError::internal)
    });
    registry
}

/// Builds the HTTP router for `registry`
pub fn router(registry: Arc<RpcRegistry>) -> Router {
    Router::new()
        .route("/", post(rpc_handler))
        .layer(CorsLayer::permissive())
        .with_state(registry)
}

async fn rpc_handler(State(registry): State<Arc<RpcRegistry>>, body: Bytes) -> Response {
    match registry.handle_body(&body) {
        Some(reply) => Json(reply).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Stats endpoint server
pub struct ApiServer {
    listen: String,
    source: Arc<StatsSource>,
    cancel: CancellationToken,
}

impl ApiServer {
    /// Creates a server for `listen` (e.g. `127.0.0.1:8989`)
    ///
    /// The server stops when `shutdown` fires or [`ApiServer::close`] is called.
    pub fn new(
        listen: impl Into<String>,
        source: Arc<StatsSource>,
        shutdown: &CancellationToken,
    ) -> Self {
        ApiServer {
            listen: listen.into(),
            source,
            cancel: shutdown.child_token(),
        }
    }

    /// Binds and serves until cancelled
    ///
    /// The stats runtime clock starts here.
    ///
    /// # Errors
    /// Returns `MinerError::ServerError` if the address cannot be bound or
    /// the serve loop fails.
    pub async fn serve(&self) -> Result<(), MinerError> {
        self.source.mark_started(Instant::now());

        let listener = TcpListener::bind(&self.listen).await.map_err(|e| {
            MinerError::ServerError(format!("Failed to bind {}: {}", self.listen, e))
        })?;
        info!("Stats API listening on http://{}", listener.local_addr()?);

        let app = router(Arc::new(registry(Arc::clone(&self.source))));
        let cancel = self.cancel.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { cancel.cancelled().await })
            .await
            .map_err(|e| MinerError::ServerError(e.to_string()))?;

        info!("Stats API stopped");
        Ok(())
    }

    /// Stops the server
    pub fn close(&self) {
        self.cancel.cancel();
    }
}
