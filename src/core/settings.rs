//! Keepalive settings - Endpoint and timing tunables

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Manager port when none is configured
pub const DEFAULT_MANAGER_PORT: u16 = 5000;
/// Ping endpoint path on the manager
pub const PING_PATH: &str = "/manager/api/ping";
/// Heartbeat cadence while the view is visible
pub const PING_INTERVAL: Duration = Duration::from_secs(60);
/// Upper bound for every request to the manager
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
/// Delay between recovery poll attempts
pub const POLL_DELAY: Duration = Duration::from_secs(2);
/// How long the "ready" notification lingers
pub const SUCCESS_DISMISS_DELAY: Duration = Duration::from_secs(2);
/// Fade-out before a dismissed notification is removed
pub const FADE_DELAY: Duration = Duration::from_millis(300);

const ENV_MANAGER_URL: &str = "MANAGER_URL";
const ENV_MANAGER_PORT: &str = "MANAGER_PORT";
const ENV_INTERVAL: &str = "KEEPALIVE_INTERVAL";
const ENV_TIMEOUT_MS: &str = "KEEPALIVE_TIMEOUT_MS";

/// Keepalive settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeepaliveSettings {
    // Endpoint
    /// Full URL of the manager's ping endpoint
    pub endpoint: String,

    // Timing
    /// Heartbeat interval in seconds
    pub ping_interval_secs: u64,
    /// Request timeout in ms
    pub request_timeout_ms: u64,
    /// Recovery poll delay in ms
    pub poll_delay_ms: u64,
    /// Success notification lifetime in ms
    pub success_dismiss_ms: u64,
    /// Overlay fade-out in ms
    pub fade_ms: u64,

    // Notifications
    pub starting_message: String,
    pub ready_message: String,
}

impl Default for KeepaliveSettings {
    fn default() -> Self {
        Self {
            endpoint: endpoint_for(&default_base_url(DEFAULT_MANAGER_PORT)),

            ping_interval_secs: PING_INTERVAL.as_secs(),
            request_timeout_ms: REQUEST_TIMEOUT.as_millis() as u64,
            poll_delay_ms: POLL_DELAY.as_millis() as u64,
            success_dismiss_ms: SUCCESS_DISMISS_DELAY.as_millis() as u64,
            fade_ms: FADE_DELAY.as_millis() as u64,

            starting_message: "Backend is starting up, please wait...".to_string(),
            ready_message: "Backend is ready".to_string(),
        }
    }
}

impl KeepaliveSettings {
    /// Load overrides from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Unparseable values are
    /// ignored with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        let port = parse_var::<u16, _>(&lookup, ENV_MANAGER_PORT).unwrap_or(DEFAULT_MANAGER_PORT);
        let base = lookup(ENV_MANAGER_URL)
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| default_base_url(port));
        settings.endpoint = endpoint_for(&base);

        if let Some(secs) = parse_var(&lookup, ENV_INTERVAL) {
            settings.ping_interval_secs = secs;
        }
        if let Some(ms) = parse_var(&lookup, ENV_TIMEOUT_MS) {
            settings.request_timeout_ms = ms;
        }

        settings.validate();
        settings
    }

    /// Validate settings and fix any invalid values
    pub fn validate(&mut self) {
        let defaults = Self::default();
        if self.ping_interval_secs == 0 {
            self.ping_interval_secs = defaults.ping_interval_secs;
        }
        if self.request_timeout_ms == 0 {
            self.request_timeout_ms = defaults.request_timeout_ms;
        }
        if self.poll_delay_ms == 0 {
            self.poll_delay_ms = defaults.poll_delay_ms;
        }
        if self.endpoint.trim().is_empty() {
            self.endpoint = defaults.endpoint;
        }
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn poll_delay(&self) -> Duration {
        Duration::from_millis(self.poll_delay_ms)
    }

    pub fn success_dismiss(&self) -> Duration {
        Duration::from_millis(self.success_dismiss_ms)
    }

    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

fn default_base_url(port: u16) -> String {
    format!("http://127.0.0.1:{}", port)
}

fn endpoint_for(base: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), PING_PATH)
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable setting");
            None
        }
    }
}
