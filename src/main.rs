//! Keepalive - Console runner for the keepalive client
//!
//! Pings the manager while the "view" is visible and prints recovery
//! notifications to the terminal. On Unix, SIGUSR1 hides the view and
//! SIGUSR2 shows it again.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use keepalive::core::{HttpPingTransport, KeepaliveController, KeepaliveSettings, VisibilityState};
use keepalive::platform::{self, ConsoleSurface};
use keepalive::{APP_NAME, APP_VERSION};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging();

    info!("{} v{} starting...", APP_NAME, APP_VERSION);

    let settings = KeepaliveSettings::from_env();
    info!(
        endpoint = %settings.endpoint,
        interval_secs = settings.ping_interval_secs,
        timeout_ms = settings.request_timeout_ms,
        "Settings loaded"
    );

    let transport =
        HttpPingTransport::new(&settings).context("Failed to build manager HTTP client")?;

    let (visibility_tx, visibility_rx) = watch::channel(VisibilityState::Visible);
    let _visibility = platform::spawn_visibility_source(visibility_tx)?;

    let controller = KeepaliveController::new(
        settings,
        Arc::new(transport),
        visibility_rx,
        ConsoleSurface::stdout(),
    );
    let handle = controller.spawn();

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    handle.shutdown().await;

    info!("{} shutting down", APP_NAME);
    Ok(())
}

/// Initialize the logging system
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("keepalive=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
