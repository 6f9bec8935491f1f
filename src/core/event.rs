//! Controller events - Everything that can wake the keepalive controller

use super::backend::{ObservedState, PingSource};
use super::poller::SessionId;
use crate::ui::ElementId;

/// Which loop a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingOrigin {
    Heartbeat,
    Poll(SessionId),
}

impl PingOrigin {
    pub fn source(&self) -> PingSource {
        match self {
            Self::Heartbeat => PingSource::Heartbeat,
            Self::Poll(_) => PingSource::Poll,
        }
    }
}

/// Messages delivered to the controller by timers and finished requests
#[derive(Debug)]
pub enum Event {
    /// Heartbeat interval elapsed for the timer of this generation
    HeartbeatTick { generation: u64 },
    /// A request finished, successfully or not
    PingCompleted {
        origin: PingOrigin,
        /// Dispatch order, increasing across both loops
        seq: u64,
        observed: ObservedState,
    },
    /// Poll delay elapsed for this session
    PollDue { session: SessionId },
    /// A transient notification reached the end of its lifetime
    OverlayExpired { element: ElementId },
    /// Fade-out finished and the element can be removed
    OverlayFaded { element: ElementId },
}
