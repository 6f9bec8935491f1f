//! Keepalive - Activity-driven keepalive and cold-start recovery client
//!
//! Keeps an on-demand backend alive while its view is open, and tells the
//! user when the backend was stopped for inactivity and is starting again.

pub mod core;
pub mod platform;
pub mod ui;

/// Application name constant
pub const APP_NAME: &str = "Keepalive";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
