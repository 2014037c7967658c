//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum app with the dispatch handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind one listener per cluster node on consecutive ports
//! - Serve until the shutdown signal fires

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json,
};
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::http::request::{RequestIdExt, RequestIdLayer};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::routing::Router;
use crate::runtime::RuntimeContext;

/// Errors raised while starting or running the server.
#[derive(Debug, Error)]
pub enum ServerStartError {
    #[error("port {port} with {nodes} cluster nodes exceeds the port range")]
    PortOverflow { port: u16, nodes: u16 },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// The component that owns the process main loop once bootstrap is done.
pub trait Server {
    /// Listen on `port` (and the following `cluster - 1` ports) until
    /// shutdown. Resolves only when serving has stopped or failed to start.
    fn start(
        &self,
        port: u16,
        cluster: Option<u16>,
    ) -> impl Future<Output = Result<(), ServerStartError>> + Send;
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub ctx: Arc<RuntimeContext>,
    pub router: Arc<Router>,
}

/// Axum-backed [`Server`].
pub struct HttpServer {
    ctx: Arc<RuntimeContext>,
    router: Arc<Router>,
    shutdown: Shutdown,
}

impl HttpServer {
    pub fn new(ctx: Arc<RuntimeContext>, router: Arc<Router>, shutdown: Shutdown) -> Self {
        Self {
            ctx,
            router,
            shutdown,
        }
    }

    /// Build the Axum app with all middleware layers.
    pub fn app(&self) -> axum::Router {
        let timeout = Duration::from_secs(self.ctx.config().request_timeout_secs);
        let state = AppState {
            ctx: self.ctx.clone(),
            router: self.router.clone(),
        };

        axum::Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                timeout,
            ))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Bind every node's listener. Nothing is kept if any bind fails.
    async fn bind_all(&self, port: u16, nodes: u16) -> Result<Vec<TcpListener>, ServerStartError> {
        let host = self.ctx.config().host.clone();
        let mut listeners = Vec::with_capacity(usize::from(nodes));

        for offset in 0..nodes {
            let node_port = port
                .checked_add(offset)
                .ok_or(ServerStartError::PortOverflow { port, nodes })?;
            let listener = TcpListener::bind((host.as_str(), node_port))
                .await
                .map_err(|source| ServerStartError::Bind {
                    addr: format!("{host}:{node_port}"),
                    source,
                })?;
            listeners.push(listener);
        }
        Ok(listeners)
    }
}

impl Server for HttpServer {
    async fn start(&self, port: u16, cluster: Option<u16>) -> Result<(), ServerStartError> {
        let nodes = cluster.unwrap_or(1).max(1);
        let listeners = self.bind_all(port, nodes).await?;

        let observability = self.ctx.config().observability.clone();
        if observability.metrics_enabled {
            match observability.metrics_address.parse() {
                Ok(addr) => {
                    if let Err(e) = metrics::init_metrics(addr) {
                        tracing::error!(error = %e, "Failed to install metrics exporter");
                    }
                }
                Err(_) => tracing::error!(
                    metrics_address = %observability.metrics_address,
                    "Failed to parse metrics address"
                ),
            }
        }
        let app = self.app();

        let mut tasks = JoinSet::new();
        for listener in listeners {
            let addr = listener.local_addr().map_err(ServerStartError::Serve)?;
            tracing::info!(
                address = %addr,
                environment = %self.ctx.environment(),
                "HTTP server starting"
            );
            let app = app.clone();
            let stop = self.shutdown.wait();
            tasks.spawn(async move {
                axum::serve(listener, app)
                    .with_graceful_shutdown(stop)
                    .await
            });
        }

        let mut outcome = Ok(());
        while let Some(joined) = tasks.join_next().await {
            let result = joined.unwrap_or_else(|e| Err(std::io::Error::other(e)));
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server node failed");
                self.shutdown.trigger();
                if outcome.is_ok() {
                    outcome = Err(ServerStartError::Serve(e));
                }
            }
        }

        tracing::info!(
            shutdown_requested = self.shutdown.is_triggered(),
            "HTTP server stopped"
        );
        outcome
    }
}

/// Main handler: find the route for the request and describe the match.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .request_id()
        .map(|id| id.as_str().to_string())
        .unwrap_or_default();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    match state.router.match_request(&request) {
        Some(route) => {
            tracing::debug!(
                request_id = %request_id,
                method = %method,
                path = %path,
                route = %route,
                "Request dispatched"
            );
            metrics::record_request(&method, 200, &route, start_time);
            Json(json!({
                "route": route,
                "environment": state.ctx.environment(),
                "path": path,
                "request_id": request_id,
            }))
            .into_response()
        }
        None => {
            tracing::warn!(request_id = %request_id, path = %path, "No route matched");
            metrics::record_request(&method, 404, "none", start_time);
            (StatusCode::NOT_FOUND, "No matching route found").into_response()
        }
    }
}
