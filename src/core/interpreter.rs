//! Backend-state interpreter - One entry point for every observation
//!
//! Heartbeat and poll results both land here. The interpreter keeps the
//! last known backend state and turns each observation into directives.
//! Overlay changes follow state *changes*: the `starting -> running`
//! transition announces readiness once, whichever loop sees it first, and a
//! repeated `running` never touches the overlay. Session bookkeeping for
//! poll results (schedule the next attempt or end the session) is applied
//! on every poll result.
//!
//! Requests from the two loops can complete out of order. Each observation
//! carries its dispatch sequence number, and one issued before the request
//! that last changed the known state is stale: it may still close or
//! continue the poll session, but never moves the state or the overlay.

use tracing::debug;

use super::backend::{BackendState, ObservedState, PingSource};
use super::poller::SessionEnd;

/// Action the controller should take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Show the info notification
    ShowStarting,
    /// Show the success notification, dismissing itself shortly after
    ShowReady,
    /// Fade out whatever is shown
    Dismiss,
    /// Open a recovery session and poll right away
    StartSession,
    /// Poll again after the poll delay
    ScheduleNextPoll,
    /// Close the recovery session
    EndSession(SessionEnd),
}

#[derive(Debug, Default)]
pub struct Interpreter {
    last_known: BackendState,
    /// Sequence number of the observation that set `last_known`
    changed_seq: u64,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_known(&self) -> BackendState {
        self.last_known
    }

    /// Interpret one observation. `seq` is the request's dispatch order;
    /// `session_active` tells whether a recovery session is currently open.
    pub fn observe(
        &mut self,
        source: PingSource,
        seq: u64,
        observed: &ObservedState,
        session_active: bool,
    ) -> Vec<Directive> {
        let previous = self.last_known;
        let state = observed.state;
        let stale = seq < self.changed_seq;

        let directives = match source {
            _ if stale => self.stale(source),
            PingSource::Heartbeat => self.heartbeat(previous, observed, session_active),
            PingSource::Poll => self.poll(previous, observed),
        };

        if self.last_known != previous {
            self.changed_seq = seq;
        }

        if let Some(report) = &observed.report {
            debug!(
                source = source.label(),
                seq,
                stale,
                state = %state,
                previous = %previous,
                uptime = ?report.uptime,
                idle_time = ?report.idle_time,
                time_until_stop = ?report.time_until_stop,
                "Backend state observed"
            );
        } else {
            debug!(
                source = source.label(),
                seq,
                stale,
                failure = ?observed.failure,
                "No usable backend state"
            );
        }

        directives
    }

    /// Out-of-order result. Heartbeats are dropped; a poll result only
    /// settles the session according to the newer known state.
    fn stale(&self, source: PingSource) -> Vec<Directive> {
        if source == PingSource::Heartbeat {
            return Vec::new();
        }

        match self.last_known {
            BackendState::Starting => vec![Directive::ScheduleNextPoll],
            BackendState::Running => vec![Directive::EndSession(SessionEnd::Ready)],
            BackendState::Stopped | BackendState::Unknown => vec![
                Directive::Dismiss,
                Directive::EndSession(SessionEnd::Abandoned),
            ],
        }
    }

    fn heartbeat(
        &mut self,
        previous: BackendState,
        observed: &ObservedState,
        session_active: bool,
    ) -> Vec<Directive> {
        let mut directives = Vec::new();

        match observed.state {
            // No information; keep what we knew
            BackendState::Unknown => {}
            BackendState::Starting => {
                if previous != BackendState::Starting {
                    directives.push(Directive::ShowStarting);
                }
                if !session_active {
                    directives.push(Directive::StartSession);
                }
                self.last_known = BackendState::Starting;
            }
            BackendState::Running => {
                if previous.is_transitional() {
                    directives.push(Directive::ShowReady);
                }
                self.last_known = BackendState::Running;
            }
            BackendState::Stopped => {
                self.last_known = BackendState::Stopped;
            }
        }

        directives
    }

    fn poll(&mut self, previous: BackendState, observed: &ObservedState) -> Vec<Directive> {
        let mut directives = Vec::new();

        match observed.state {
            BackendState::Starting => {
                if previous != BackendState::Starting {
                    directives.push(Directive::ShowStarting);
                }
                directives.push(Directive::ScheduleNextPoll);
            }
            BackendState::Running => {
                if previous != BackendState::Running {
                    directives.push(Directive::ShowReady);
                }
                directives.push(Directive::EndSession(SessionEnd::Ready));
            }
            BackendState::Stopped | BackendState::Unknown => {
                let reason = if observed.is_transport_failure() {
                    SessionEnd::Unreachable
                } else {
                    SessionEnd::Abandoned
                };
                directives.push(Directive::Dismiss);
                directives.push(Directive::EndSession(reason));
            }
        }

        self.last_known = observed.state;
        directives
    }
}
