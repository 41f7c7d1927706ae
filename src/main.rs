// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use crate::application::telemetry_feed::TelemetryFeed;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::http_source::HttpSampleSource;
use crate::presentation::app_state::AppState;
use crate::presentation::routes::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create source (infrastructure layer)
    let source = Arc::new(HttpSampleSource::new(&config.upstream)?);

    // Create feed (application layer)
    let mut feed = TelemetryFeed::new(source, config.feed.stream_options());
    feed.start().await;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let state = Arc::new(AppState {
        feed: feed.handle(),
        shutdown: shutdown_rx,
    });

    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!(%addr, upstream = %config.upstream.base_url, "Starting farm-telemetry service");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "could not listen for shutdown signal");
            }
            tracing::info!("Shutting down");
            // ends open view streams so the server can drain
            let _ = shutdown_tx.send(true);
        })
        .await?;

    feed.stop().await;
    Ok(())
}
