//! Heartbeat loop - Periodic liveness signal while the view is visible

use std::time::Duration;
use tracing::{debug, info};

use super::event::Event;
use super::schedule::{ScheduledTask, Scheduler};

/// The one live repeating timer
struct HeartbeatTimer {
    generation: u64,
    _task: ScheduledTask,
}

/// What to do with a heartbeat tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Send a heartbeat now
    Fire,
    /// Previous heartbeat still outstanding
    Skipped,
    /// Tick from a timer that has since been torn down
    Stale,
}

/// Owns the heartbeat timer and tracks the outstanding request
pub struct HeartbeatLoop {
    period: Duration,
    timer: Option<HeartbeatTimer>,
    next_generation: u64,
    in_flight: bool,
    /// Activated while a request was outstanding; fire when it completes
    pending_immediate: bool,
    sent: u64,
}

impl HeartbeatLoop {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            timer: None,
            next_generation: 0,
            in_flight: false,
            pending_immediate: false,
            sent: 0,
        }
    }

    /// Heartbeats issued so far
    pub fn sent(&self) -> u64 {
        self.sent
    }

    /// Start the timer. Its first tick is immediate, or deferred to the
    /// completion of a heartbeat still outstanding from before.
    pub fn activate(&mut self, scheduler: &Scheduler<Event>) -> bool {
        if self.timer.is_some() {
            return false;
        }

        self.pending_immediate = self.in_flight;

        self.next_generation += 1;
        let generation = self.next_generation;
        let task = scheduler.every(self.period, move || Event::HeartbeatTick { generation });
        self.timer = Some(HeartbeatTimer {
            generation,
            _task: task,
        });

        info!(
            interval_secs = self.period.as_secs(),
            "Heartbeat activated"
        );
        true
    }

    /// Tear down the timer. An outstanding request is left alone.
    pub fn deactivate(&mut self) -> bool {
        self.pending_immediate = false;
        match self.timer.take() {
            Some(_) => {
                info!(in_flight = self.in_flight, "Heartbeat deactivated");
                true
            }
            None => false,
        }
    }

    pub fn on_tick(&mut self, generation: u64) -> TickOutcome {
        match &self.timer {
            Some(timer) if timer.generation == generation => {}
            _ => return TickOutcome::Stale,
        }

        if self.in_flight {
            debug!("Previous heartbeat still outstanding, skipping tick");
            return TickOutcome::Skipped;
        }

        self.in_flight = true;
        self.sent += 1;
        TickOutcome::Fire
    }

    /// Record the outstanding heartbeat as finished. Returns
    /// [`TickOutcome::Fire`] when an activation was waiting on it.
    pub fn on_completed(&mut self) -> TickOutcome {
        self.in_flight = false;

        if !self.pending_immediate || self.timer.is_none() {
            return TickOutcome::Skipped;
        }

        debug!("Sending heartbeat deferred by activation");
        self.pending_immediate = false;
        self.in_flight = true;
        self.sent += 1;
        TickOutcome::Fire
    }
}
