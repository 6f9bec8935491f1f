//! Core module - Keepalive state machine, loops, and manager transport

pub mod backend;
pub mod controller;
pub mod event;
pub mod heartbeat;
pub mod interpreter;
pub mod poller;
pub mod schedule;
pub mod settings;
pub mod transport;
pub mod visibility;

pub use backend::{BackendState, ObservedState, PingSource, StatusReport};
pub use controller::{KeepaliveController, KeepaliveHandle};
pub use settings::KeepaliveSettings;
pub use transport::{HttpPingTransport, PingError, PingTransport};
pub use visibility::{VisibilityGate, VisibilityState};
