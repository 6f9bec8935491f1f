//! Shared test doubles: a scripted manager and a recording overlay surface

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

use keepalive::core::{
    KeepaliveController, KeepaliveHandle, KeepaliveSettings, PingError, PingTransport,
    StatusReport, VisibilityState,
};
use keepalive::ui::{ElementId, Notification, NotificationStyle, OverlaySurface};

/// One scripted manager answer
#[derive(Debug, Clone)]
pub enum Reply {
    /// `{"state": ...}`
    State(&'static str),
    /// Raw body, decoded like the HTTP transport would
    Body(&'static str),
    /// `{"state": ...}` after a delay
    Slow(&'static str, Duration),
    /// Connection refused
    Fail,
    /// Never answers; only the request timeout ends it
    Hang,
}

/// Manager stand-in that answers from a script, then repeats a fallback
pub struct ScriptedManager {
    script: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    calls: Mutex<Vec<Instant>>,
    started: Instant,
}

impl ScriptedManager {
    pub fn new(script: impl IntoIterator<Item = Reply>, fallback: Reply) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into_iter().collect()),
            fallback,
            calls: Mutex::new(Vec::new()),
            started: Instant::now(),
        })
    }

    pub fn always(reply: Reply) -> Arc<Self> {
        Self::new([], reply)
    }

    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Call times relative to construction
    pub fn call_offsets(&self) -> Vec<Duration> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|at| at.duration_since(self.started))
            .collect()
    }
}

#[async_trait]
impl PingTransport for ScriptedManager {
    async fn ping(&self) -> Result<StatusReport, PingError> {
        self.calls.lock().unwrap().push(Instant::now());
        let reply = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            Reply::State(state) => Ok(StatusReport::with_state(state)),
            Reply::Slow(state, latency) => {
                tokio::time::sleep(latency).await;
                Ok(StatusReport::with_state(state))
            }
            Reply::Body(body) => Ok(serde_json::from_str(body)?),
            Reply::Fail => Err(PingError::Transport("connection refused".to_string())),
            Reply::Hang => std::future::pending().await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    Mount {
        element: ElementId,
        style: NotificationStyle,
        message: String,
        inline_style: String,
        at: Duration,
    },
    Fade {
        element: ElementId,
        at: Duration,
    },
    Remove {
        element: ElementId,
        at: Duration,
    },
}

#[derive(Default)]
struct SurfaceLog {
    calls: Vec<SurfaceCall>,
    live: Vec<ElementId>,
    max_live: usize,
}

/// Overlay surface that records every call with its (virtual) time
#[derive(Clone)]
pub struct RecordingSurface {
    log: Arc<Mutex<SurfaceLog>>,
    started: Instant,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(SurfaceLog::default())),
            started: Instant::now(),
        }
    }

    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.log.lock().unwrap().calls.clone()
    }

    /// (style, message) of every mounted element, in order
    pub fn mounted(&self) -> Vec<(NotificationStyle, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SurfaceCall::Mount { style, message, .. } => Some((style, message)),
                _ => None,
            })
            .collect()
    }

    pub fn live(&self) -> Vec<ElementId> {
        self.log.lock().unwrap().live.clone()
    }

    pub fn max_live(&self) -> usize {
        self.log.lock().unwrap().max_live
    }

    fn now(&self) -> Duration {
        Instant::now().duration_since(self.started)
    }
}

impl OverlaySurface for RecordingSurface {
    fn mount(&mut self, element: ElementId, notification: &Notification, inline_style: &str) {
        let at = self.now();
        let mut log = self.log.lock().unwrap();
        log.calls.push(SurfaceCall::Mount {
            element,
            style: notification.style,
            message: notification.message.clone(),
            inline_style: inline_style.to_string(),
            at,
        });
        log.live.push(element);
        log.max_live = log.max_live.max(log.live.len());
    }

    fn begin_fade(&mut self, element: ElementId) {
        let at = self.now();
        self.log
            .lock()
            .unwrap()
            .calls
            .push(SurfaceCall::Fade { element, at });
    }

    fn remove(&mut self, element: ElementId) {
        let at = self.now();
        let mut log = self.log.lock().unwrap();
        log.calls.push(SurfaceCall::Remove { element, at });
        log.live.retain(|id| *id != element);
    }
}

/// A running controller plus the knobs a test needs
pub struct Harness {
    pub manager: Arc<ScriptedManager>,
    pub surface: RecordingSurface,
    pub visibility: watch::Sender<VisibilityState>,
    pub handle: KeepaliveHandle,
}

impl Harness {
    pub fn start(manager: Arc<ScriptedManager>, initial: VisibilityState) -> Self {
        Self::start_with(manager, initial, KeepaliveSettings::default())
    }

    pub fn start_with(
        manager: Arc<ScriptedManager>,
        initial: VisibilityState,
        settings: KeepaliveSettings,
    ) -> Self {
        let surface = RecordingSurface::new();
        let (visibility, rx) = watch::channel(initial);
        let transport: Arc<dyn PingTransport> = manager.clone();
        let handle = KeepaliveController::new(settings, transport, rx, surface.clone()).spawn();

        Self {
            manager,
            surface,
            visibility,
            handle,
        }
    }

    pub fn set_visibility(&self, state: VisibilityState) {
        self.visibility.send(state).unwrap();
    }
}

/// Advance virtual time, letting every due timer and request run
pub async fn advance(duration: Duration) {
    tokio::time::sleep(duration).await;
}

pub fn secs(value: u64) -> Duration {
    Duration::from_secs(value)
}

pub fn millis(value: u64) -> Duration {
    Duration::from_millis(value)
}
