//! Unix visibility source - SIGUSR1 hides the view, SIGUSR2 shows it

use anyhow::{Context, Result};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::core::VisibilityState;

pub fn spawn_visibility_source(tx: watch::Sender<VisibilityState>) -> Result<JoinHandle<()>> {
    let mut hide =
        signal(SignalKind::user_defined1()).context("Failed to install SIGUSR1 handler")?;
    let mut show =
        signal(SignalKind::user_defined2()).context("Failed to install SIGUSR2 handler")?;

    Ok(tokio::spawn(async move {
        loop {
            let next = tokio::select! {
                _ = tx.closed() => break,
                Some(()) = hide.recv() => VisibilityState::Hidden,
                Some(()) = show.recv() => VisibilityState::Visible,
                else => break,
            };

            debug!(state = next.label(), "Host visibility signal");
            if tx.send(next).is_err() {
                break;
            }
        }
    }))
}
