//! Platform-specific host glue for the console runner

mod console;
#[cfg(unix)]
mod unix;

pub use console::ConsoleSurface;

use anyhow::Result;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::core::VisibilityState;

/// Feed the host visibility signal into `tx`
pub fn spawn_visibility_source(tx: watch::Sender<VisibilityState>) -> Result<JoinHandle<()>> {
    #[cfg(unix)]
    {
        unix::spawn_visibility_source(tx)
    }
    #[cfg(not(unix))]
    {
        // No host signal here; the view stays visible
        Ok(tokio::spawn(async move { tx.closed().await }))
    }
}
