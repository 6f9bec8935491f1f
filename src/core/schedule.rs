//! Scheduled tasks - Cancellable timers that report back as events
//!
//! Every timer in the client (heartbeat interval, poll delay, overlay
//! dismissal and fade) is a [`ScheduledTask`]: a spawned timer that posts a
//! message onto the controller's channel when it fires. Dropping the handle
//! cancels the timer, so owning a handle in an `Option` is the whole
//! lifecycle.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Handle to a pending timer. Cancelled on drop.
#[derive(Debug)]
pub struct ScheduledTask {
    token: CancellationToken,
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Creates timers that deliver messages to one channel
#[derive(Debug)]
pub struct Scheduler<T> {
    tx: UnboundedSender<T>,
}

impl<T> Clone for Scheduler<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T: Send + 'static> Scheduler<T> {
    pub fn new(tx: UnboundedSender<T>) -> Self {
        Self { tx }
    }

    /// Deliver `message` once after `delay`
    pub fn after(&self, delay: Duration, message: T) -> ScheduledTask {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = tx.send(message);
                }
            }
        });

        ScheduledTask { token }
    }

    /// Deliver a message right away and then every `period`
    pub fn every<F>(&self, period: Duration, mut make: F) -> ScheduledTask
    where
        F: FnMut() -> T + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = ticker.tick() => {
                        if tx.send(make()).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        ScheduledTask { token }
    }
}
