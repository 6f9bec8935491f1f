//! Recovery poller - Sequential fast polling while the backend cold-starts

use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

use super::event::Event;
use super::schedule::{ScheduledTask, Scheduler};

/// Identifier of one recovery session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "poll-{}", self.0)
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Backend reported running
    Ready,
    /// Backend unreachable
    Unreachable,
    /// Backend reported something other than starting/running
    Abandoned,
    /// Controller shut down
    Cancelled,
}

/// One live recovery session
pub struct PollSession {
    pub id: SessionId,
    pub attempts: u32,
    pub started_at: Instant,
    in_flight: bool,
    next_attempt: Option<ScheduledTask>,
}

/// Owns at most one [`PollSession`]
pub struct RecoveryPoller {
    delay: Duration,
    session: Option<PollSession>,
    next_id: u64,
}

impl RecoveryPoller {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            session: None,
            next_id: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Open a session unless one is already running
    pub fn start(&mut self) -> Option<SessionId> {
        if let Some(session) = &self.session {
            debug!(session = %session.id, "Recovery session already active");
            return None;
        }

        self.next_id += 1;
        let id = SessionId(self.next_id);
        self.session = Some(PollSession {
            id,
            attempts: 0,
            started_at: Instant::now(),
            in_flight: false,
            next_attempt: None,
        });

        info!(session = %id, "Recovery session started");
        Some(id)
    }

    /// Whether a result or timer for `id` belongs to the live session
    pub fn accepts(&self, id: SessionId) -> bool {
        self.session.as_ref().is_some_and(|s| s.id == id)
    }

    /// Mark the next attempt as outstanding. Refused when the session is
    /// gone or an attempt is already in flight.
    pub fn begin_attempt(&mut self, id: SessionId) -> bool {
        let Some(session) = self.session.as_mut().filter(|s| s.id == id) else {
            return false;
        };
        if session.in_flight {
            return false;
        }

        session.in_flight = true;
        session.next_attempt = None;
        session.attempts += 1;
        debug!(session = %id, attempt = session.attempts, "Recovery poll");
        true
    }

    /// Record that the outstanding attempt finished
    pub fn complete_attempt(&mut self, id: SessionId) {
        if let Some(session) = self.session.as_mut().filter(|s| s.id == id) {
            session.in_flight = false;
        }
    }

    /// Queue the next attempt after the poll delay
    pub fn schedule_next(&mut self, scheduler: &Scheduler<Event>) {
        let delay = self.delay;
        if let Some(session) = self.session.as_mut() {
            if session.in_flight || session.next_attempt.is_some() {
                return;
            }
            session.next_attempt = Some(scheduler.after(
                delay,
                Event::PollDue {
                    session: session.id,
                },
            ));
        }
    }

    /// Close the live session, dropping any queued attempt
    pub fn end(&mut self, reason: SessionEnd) -> Option<PollSession> {
        let session = self.session.take()?;
        info!(
            session = %session.id,
            attempts = session.attempts,
            elapsed_ms = session.started_at.elapsed().as_millis() as u64,
            reason = ?reason,
            "Recovery session ended"
        );
        Some(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn only_one_session_at_a_time() {
        let mut poller = RecoveryPoller::new(Duration::from_secs(2));

        let first = poller.start().unwrap();
        assert!(poller.start().is_none());
        assert!(poller.accepts(first));

        poller.end(SessionEnd::Ready);
        let second = poller.start().unwrap();
        assert_ne!(first, second);
        assert!(!poller.accepts(first));
    }

    #[tokio::test(start_paused = true)]
    async fn attempts_are_sequential() {
        let mut poller = RecoveryPoller::new(Duration::from_secs(2));
        let id = poller.start().unwrap();

        assert!(poller.begin_attempt(id));
        assert!(!poller.begin_attempt(id));

        poller.complete_attempt(id);
        assert!(poller.begin_attempt(id));
        assert_eq!(poller.session.as_ref().unwrap().attempts, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn next_attempt_fires_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = Scheduler::new(tx);
        let mut poller = RecoveryPoller::new(Duration::from_secs(2));
        let id = poller.start().unwrap();
        let started = Instant::now();

        poller.begin_attempt(id);
        poller.complete_attempt(id);
        poller.schedule_next(&scheduler);
        poller.schedule_next(&scheduler);

        match rx.recv().await {
            Some(Event::PollDue { session }) => assert_eq!(session, id),
            other => panic!("unexpected event {:?}", other),
        }
        assert!(started.elapsed() >= Duration::from_secs(2));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn ending_session_drops_queued_attempt() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = Scheduler::new(tx);
        let mut poller = RecoveryPoller::new(Duration::from_secs(2));
        let id = poller.start().unwrap();

        poller.schedule_next(&scheduler);
        let ended = poller.end(SessionEnd::Cancelled).unwrap();
        assert_eq!(ended.id, id);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
        assert!(!poller.begin_attempt(id));
    }
}
