//! Backend run state - What the manager reports about the backend process

use serde::{Deserialize, Serialize};

use super::transport::PingError;

/// Run state of the managed backend, as last reported by the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendState {
    /// Backend is stopped (idle timeout or never started)
    Stopped,
    /// Backend is cold-starting
    Starting,
    /// Backend is up and serving
    Running,
    /// No usable answer: request failed or the state field was missing/unrecognized
    #[default]
    Unknown,
}

impl BackendState {
    /// Map the manager's `state` field onto a backend state
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("stopped") => Self::Stopped,
            Some("starting") => Self::Starting,
            Some("running") => Self::Running,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::Starting => "Starting",
            Self::Running => "Running",
            Self::Unknown => "Unknown",
        }
    }

    /// Steady states end a recovery session; only `Starting` keeps it alive
    pub fn is_transitional(&self) -> bool {
        matches!(self, Self::Starting)
    }
}

impl std::fmt::Display for BackendState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Decoded body of the manager's status/ping response.
///
/// Only `state` drives behavior. The timing fields are reported by the
/// manager alongside it and are kept for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusReport {
    /// Raw state string (`stopped`, `starting`, `running`)
    pub state: Option<String>,
    /// Seconds since the backend became ready
    pub uptime: Option<u64>,
    /// Seconds since the last proxied activity
    pub idle_time: Option<u64>,
    /// Seconds left before the manager stops the backend for inactivity
    pub time_until_stop: Option<u64>,
    /// Configured idle timeout in seconds
    pub idle_timeout: Option<u64>,
}

impl StatusReport {
    pub fn with_state(state: impl Into<String>) -> Self {
        Self {
            state: Some(state.into()),
            ..Default::default()
        }
    }

    pub fn backend_state(&self) -> BackendState {
        BackendState::from_wire(self.state.as_deref())
    }
}

/// Which loop issued a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingSource {
    Heartbeat,
    Poll,
}

impl PingSource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Heartbeat => "heartbeat",
            Self::Poll => "poll",
        }
    }
}

/// Why a round trip produced no usable state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Network failure or timeout
    Transport,
    /// Non-success status or a body that didn't decode
    Protocol,
}

/// Outcome of one round trip, folded down to what the interpreter needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedState {
    pub state: BackendState,
    pub failure: Option<Failure>,
    pub report: Option<StatusReport>,
}

impl ObservedState {
    pub fn from_result(result: Result<StatusReport, PingError>) -> Self {
        match result {
            Ok(report) => Self {
                state: report.backend_state(),
                failure: None,
                report: Some(report),
            },
            Err(err) => Self {
                state: BackendState::Unknown,
                failure: Some(if err.is_transport() {
                    Failure::Transport
                } else {
                    Failure::Protocol
                }),
                report: None,
            },
        }
    }

    pub fn is_transport_failure(&self) -> bool {
        self.failure == Some(Failure::Transport)
    }
}
