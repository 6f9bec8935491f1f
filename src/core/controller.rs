//! Keepalive controller - Owns the loops and the overlay on a single task
//!
//! All state lives in [`KeepaliveController`] and is only touched from its
//! `run` loop. Timers and requests are spawned tasks that report back over
//! one channel, so heartbeat and poll results interleave but never race.

use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::backend::ObservedState;
use super::event::{Event, PingOrigin};
use super::heartbeat::{HeartbeatLoop, TickOutcome};
use super::interpreter::{Directive, Interpreter};
use super::poller::{RecoveryPoller, SessionEnd};
use super::schedule::Scheduler;
use super::settings::KeepaliveSettings;
use super::transport::{PingError, PingTransport};
use super::visibility::{VisibilityGate, VisibilityState};
use crate::ui::{Notification, OverlaySurface, StatusOverlay};

/// Keeps the backend alive and surfaces its recovery
pub struct KeepaliveController<S> {
    settings: KeepaliveSettings,
    transport: Arc<dyn PingTransport>,
    gate: VisibilityGate,
    heartbeat: HeartbeatLoop,
    poller: RecoveryPoller,
    interpreter: Interpreter,
    overlay: StatusOverlay<S>,
    scheduler: Scheduler<Event>,
    events_tx: UnboundedSender<Event>,
    events: UnboundedReceiver<Event>,
    /// Dispatch order of the next request
    next_seq: u64,
}

impl<S: OverlaySurface> KeepaliveController<S> {
    pub fn new(
        settings: KeepaliveSettings,
        transport: Arc<dyn PingTransport>,
        visibility: watch::Receiver<VisibilityState>,
        surface: S,
    ) -> Self {
        let (events_tx, events) = mpsc::unbounded_channel();
        let scheduler = Scheduler::new(events_tx.clone());

        Self {
            heartbeat: HeartbeatLoop::new(settings.ping_interval()),
            poller: RecoveryPoller::new(settings.poll_delay()),
            overlay: StatusOverlay::new(surface, scheduler.clone(), settings.fade()),
            interpreter: Interpreter::new(),
            gate: VisibilityGate::new(visibility),
            settings,
            transport,
            scheduler,
            events_tx,
            events,
            next_seq: 0,
        }
    }

    /// Drive the client until `shutdown` is cancelled
    pub async fn run(mut self, shutdown: CancellationToken) {
        info!(
            endpoint = %self.transport.describe(),
            visibility = self.gate.current().label(),
            "Keepalive controller running"
        );

        if self.gate.current().is_visible() {
            self.heartbeat.activate(&self.scheduler);
        }

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                transition = self.gate.next_transition(), if !self.gate.is_closed() => {
                    if let Some(state) = transition {
                        self.on_visibility(state);
                    }
                }
                Some(event) = self.events.recv() => self.handle(event),
            }
        }

        self.teardown();
    }

    fn on_visibility(&mut self, state: VisibilityState) {
        info!(state = state.label(), "Visibility changed");
        match state {
            VisibilityState::Visible => {
                self.heartbeat.activate(&self.scheduler);
            }
            VisibilityState::Hidden => {
                self.heartbeat.deactivate();
            }
        }
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::HeartbeatTick { generation } => {
                if self.heartbeat.on_tick(generation) == TickOutcome::Fire {
                    self.dispatch(PingOrigin::Heartbeat);
                }
            }
            Event::PingCompleted {
                origin,
                seq,
                observed,
            } => self.on_ping_completed(origin, seq, observed),
            Event::PollDue { session } => {
                if self.poller.begin_attempt(session) {
                    self.dispatch(PingOrigin::Poll(session));
                }
            }
            Event::OverlayExpired { element } => self.overlay.on_expired(element),
            Event::OverlayFaded { element } => self.overlay.on_faded(element),
        }
    }

    fn on_ping_completed(&mut self, origin: PingOrigin, seq: u64, observed: ObservedState) {
        match origin {
            PingOrigin::Heartbeat => {
                if self.heartbeat.on_completed() == TickOutcome::Fire {
                    self.dispatch(PingOrigin::Heartbeat);
                }
            }
            PingOrigin::Poll(session) => {
                if !self.poller.accepts(session) {
                    debug!(session = %session, "Dropping result for closed session");
                    return;
                }
                self.poller.complete_attempt(session);
            }
        }

        let directives =
            self.interpreter
                .observe(origin.source(), seq, &observed, self.poller.is_active());
        for directive in directives {
            self.apply(directive);
        }
    }

    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::ShowStarting => {
                self.overlay
                    .show(Notification::info(self.settings.starting_message.clone()));
            }
            Directive::ShowReady => {
                self.overlay.show_transient(
                    Notification::success(self.settings.ready_message.clone()),
                    self.settings.success_dismiss(),
                );
            }
            Directive::Dismiss => self.overlay.hide(),
            Directive::StartSession => {
                if let Some(session) = self.poller.start() {
                    if self.poller.begin_attempt(session) {
                        self.dispatch(PingOrigin::Poll(session));
                    }
                }
            }
            Directive::ScheduleNextPoll => self.poller.schedule_next(&self.scheduler),
            Directive::EndSession(reason) => {
                self.poller.end(reason);
            }
        }
    }

    /// Issue one bounded request. The result comes back as an event; nothing
    /// cancels it once sent.
    fn dispatch(&mut self, origin: PingOrigin) {
        self.next_seq += 1;
        let seq = self.next_seq;
        let transport = Arc::clone(&self.transport);
        let tx = self.events_tx.clone();
        let timeout = self.settings.request_timeout();

        tokio::spawn(async move {
            let result = match tokio::time::timeout(timeout, transport.ping()).await {
                Ok(result) => result,
                Err(_) => Err(PingError::Timeout),
            };

            if let Err(err) = &result {
                debug!(origin = ?origin, error = %err, "Ping failed");
            }

            let _ = tx.send(Event::PingCompleted {
                origin,
                seq,
                observed: ObservedState::from_result(result),
            });
        });
    }

    fn teardown(&mut self) {
        self.heartbeat.deactivate();
        self.poller.end(SessionEnd::Cancelled);
        self.overlay.clear();
        info!(
            heartbeats = self.heartbeat.sent(),
            last_known = %self.interpreter.last_known(),
            "Keepalive controller stopped"
        );
    }
}

impl<S: OverlaySurface + Send + 'static> KeepaliveController<S> {
    /// Run the controller on its own task
    pub fn spawn(self) -> KeepaliveHandle {
        let shutdown = CancellationToken::new();
        let join = tokio::spawn(self.run(shutdown.clone()));
        KeepaliveHandle { shutdown, join }
    }
}

/// Handle to a spawned controller
pub struct KeepaliveHandle {
    shutdown: CancellationToken,
    join: JoinHandle<()>,
}

impl KeepaliveHandle {
    /// Cancel every timer, end any recovery session, remove the overlay and
    /// wait for the controller to stop
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(err) = self.join.await {
            warn!(error = %err, "Keepalive controller task failed");
        }
    }
}
