//! HTTP Server
//!
//! Axum-based server exposing the current metrics and the health endpoints.
//!
//! # Endpoints
//!
//! - `GET /` - HTML landing page with links to the other routes
//! - `GET /metrics` - Prometheus metrics in text format, always 200
//! - `GET /healthz` - Liveness, always 200 "ok"
//! - `GET /readyz` - 200 "ok" once a scrape has been attempted, 503 "not ready" before
//!
//! Handlers only read the shared [`MetricsCollector`] and [`Readiness`] flag; they
//! never wait on the scrape loop.
//!
//! # Shutdown
//!
//! [`serve`] stops accepting connections when the shutdown channel fires and
//! gives in-flight requests [`SHUTDOWN_TIMEOUT`] to finish before abandoning them.
//!
//! # Connection limits
//!
//! Request heads must arrive within [`READ_TIMEOUT`] and handlers are cut off
//! after [`REQUEST_TIMEOUT`]. No connection outlives [`IDLE_TIMEOUT`].

use crate::error::Result;
use crate::metrics::MetricsCollector;
use crate::scheduler::{shutdown_requested, Readiness};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::timeout::TimeoutLayer;
use tracing::{debug, error, info, warn};

/// Upper bound on the time spent serving a single request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Time a client has to send a complete request head
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound on a connection's lifetime, covering idle keep-alive time
pub const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Grace period for in-flight requests once shutdown starts
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

#[derive(Clone)]
pub struct AppState {
    metrics: MetricsCollector,
    readiness: Readiness,
}

impl AppState {
    pub fn new(metrics: MetricsCollector, readiness: Readiness) -> Self {
        Self { metrics, readiness }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(healthz_handler))
        .route("/readyz", get(readyz_handler))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .with_state(state)
}

/// Per-connection bounds enforced by [`serve_with_limits`]
#[derive(Debug, Clone, Copy)]
pub struct ConnectionLimits {
    /// Time a client has to send a complete request head
    pub header_read_timeout: Duration,
    /// Longest a single connection may stay open, idle keep-alive time included
    pub max_connection_age: Duration,
}

impl Default for ConnectionLimits {
    fn default() -> Self {
        Self {
            header_read_timeout: READ_TIMEOUT,
            max_connection_age: IDLE_TIMEOUT,
        }
    }
}

/// Serve `app` on `listener` until `shutdown` fires
///
/// Returns `Ok(())` after a graceful shutdown, including one that overran
/// [`SHUTDOWN_TIMEOUT`] and had to be cut short.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    serve_with_limits(listener, app, shutdown, ConnectionLimits::default()).await
}

/// [`serve`] with explicit connection limits
pub async fn serve_with_limits(
    listener: TcpListener,
    app: Router,
    mut shutdown: watch::Receiver<bool>,
    limits: ConnectionLimits,
) -> Result<()> {
    let addr = listener.local_addr()?;
    info!(%addr, "starting HTTP server");

    let mut builder = http1::Builder::new();
    builder
        .timer(TokioTimer::new())
        .header_read_timeout(limits.header_read_timeout);
    let graceful = GracefulShutdown::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                        continue;
                    }
                };
                let service = TowerToHyperService::new(app.clone());
                let conn = builder.serve_connection(TokioIo::new(stream), service);
                let conn = graceful.watch(conn);
                tokio::spawn(async move {
                    match tokio::time::timeout(limits.max_connection_age, conn).await {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => debug!(%peer, error = %e, "connection closed with error"),
                        Err(_) => debug!(%peer, "connection reached its maximum age"),
                    }
                });
            }
            _ = shutdown_requested(&mut shutdown) => break,
        }
    }
    drop(listener);

    info!("shutting down HTTP server");
    if tokio::time::timeout(SHUTDOWN_TIMEOUT, graceful.shutdown())
        .await
        .is_err()
    {
        error!(timeout = ?SHUTDOWN_TIMEOUT, "HTTP server shutdown timed out");
    }
    Ok(())
}

async fn root_handler() -> impl IntoResponse {
    Html(
        r#"<html>
<head><title>Storage Box Exporter</title></head>
<body>
<h1>Storage Box Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
<p><a href="/healthz">Health</a></p>
<p><a href="/readyz">Readiness</a></p>
</body>
</html>"#,
    )
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(metrics) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], metrics).into_response(),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {}", e),
            )
                .into_response()
        }
    }
}

async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok\n")
}

async fn readyz_handler(State(state): State<AppState>) -> impl IntoResponse {
    if state.readiness.is_ready() {
        (StatusCode::OK, "ok\n")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready\n")
    }
}
