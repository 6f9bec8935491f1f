//! Visibility gate - Follows the host's foreground/background signal

use tokio::sync::watch;
use tracing::debug;

/// Whether the host view is in the foreground
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisibilityState {
    #[default]
    Visible,
    Hidden,
}

impl VisibilityState {
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        }
    }
}

/// Subscription to the host's visibility signal.
///
/// Reports transitions only; a repeated notification of the current state
/// is swallowed.
pub struct VisibilityGate {
    rx: watch::Receiver<VisibilityState>,
    current: VisibilityState,
    closed: bool,
}

impl VisibilityGate {
    pub fn new(mut rx: watch::Receiver<VisibilityState>) -> Self {
        let current = *rx.borrow_and_update();
        Self {
            rx,
            current,
            closed: false,
        }
    }

    pub fn current(&self) -> VisibilityState {
        self.current
    }

    /// The host dropped its end; the last known state stays in force
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Wait for the next real transition. Cancel-safe.
    pub async fn next_transition(&mut self) -> Option<VisibilityState> {
        loop {
            if self.rx.changed().await.is_err() {
                debug!(state = self.current.label(), "Visibility source closed");
                self.closed = true;
                return None;
            }

            let next = *self.rx.borrow_and_update();
            if next != self.current {
                self.current = next;
                return Some(next);
            }
        }
    }
}
