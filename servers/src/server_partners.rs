//! # Partner Directory Server
//!
//! Serves a joined, paged view of the partner directory over REST.
//!
//! ## Workflow:
//! 1.  **Configuration**: `.env`, then defaults, `server_partners.conf`, environment
//!     and CLI flags (later wins).
//! 2.  **Logging**: console + daily rolling JSON file, guard held until exit.
//! 3.  **Refresh**: a background scheduler fetches both upstream listings, joins them
//!     and publishes the result into a shared cache, once at startup and then on the
//!     configured cron schedule. Requests never wait for it.
//! 4.  **Serve**: `axum` on `0.0.0.0:<port>` until Ctrl-C/SIGTERM, then drain in-flight
//!     requests and stop the scheduler.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use lib_partners::loggers::setup_logging;
use lib_partners::{JoinedCache, RefreshPipeline, RefreshScheduler};

mod partners_logic;
use partners_logic::{config, routes};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = config::load_config()?;
    let _guard = setup_logging(&settings.log_dir, &settings.log_level, "server_partners")?;
    info!(?settings, "Configuration loaded.");

    let cache = Arc::new(JoinedCache::new());
    let pipeline = Arc::new(RefreshPipeline::from_settings(&settings.pipeline)?);
    let refresher = RefreshScheduler::new(
        pipeline,
        Arc::clone(&cache),
        settings.pipeline.publish_empty_results,
    );
    let mut jobs = refresher.start(&settings.pipeline.refresh_cron).await?;

    let cors = routes::cors_layer(&settings.cors_origin)?;
    let app = routes::app(routes::AppState::new(cache), cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Starting HTTP server on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = jobs.shutdown().await {
        error!("Failed to stop the refresh scheduler: {}", e);
    }
    info!("Shutdown complete.");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut term_signal) => {
                term_signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl-C received, initiating shutdown."),
        _ = terminate => info!("SIGTERM received, initiating shutdown."),
    }
}
