//! Process lifecycle
//!
//! Wires the scrape loop and the HTTP server to a single shutdown channel:
//!
//! 1. The listener is bound up front so a bad address fails startup.
//! 2. The scrape loop is spawned in the background.
//! 3. The HTTP server runs in the foreground until SIGINT/SIGTERM.
//! 4. On shutdown the server drains (bounded) and the scrape loop exits on its own.

use crate::config::Config;
use crate::hetzner::{HetznerClient, StorageBoxSource};
use crate::metrics::MetricsCollector;
use crate::scheduler::{Readiness, ScrapeScheduler};
use crate::server::{self, AppState};
use anyhow::Context;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};

/// Run the exporter against the Hetzner API until a termination signal arrives
pub async fn run(config: Config) -> anyhow::Result<()> {
    let client = HetznerClient::new(&config.hcloud).context("Failed to build Hetzner API client")?;

    let listener = TcpListener::bind(&config.server.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.listen_addr))?;

    run_with(&config, listener, Arc::new(client), shutdown_signal()).await
}

/// Run the exporter with an explicit listener, inventory source and stop signal
pub async fn run_with<F>(
    config: &Config,
    listener: TcpListener,
    source: Arc<dyn StorageBoxSource>,
    signal: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics = MetricsCollector::new()?;
    let readiness = Readiness::new();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scheduler = ScrapeScheduler::new(
        source,
        metrics.clone(),
        readiness.clone(),
        config.scrape.refresh_interval,
        config.scrape.timeout,
    );
    let scrape_handle = tokio::spawn(scheduler.run(shutdown_rx.clone()));

    let signal_handle = tokio::spawn(async move {
        signal.await;
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    let app = server::build_router(AppState::new(metrics, readiness));
    let served = server::serve(listener, app, shutdown_rx).await;

    // Dropping the sender also stops the scrape loop if the server died on its own
    signal_handle.abort();
    if let Err(e) = scrape_handle.await {
        error!(error = %e, "scrape loop terminated abnormally");
    }

    served.context("HTTP server failed")?;
    info!("storage box exporter stopped");
    Ok(())
}

/// Resolves on SIGINT (Ctrl-C) or, on Unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
