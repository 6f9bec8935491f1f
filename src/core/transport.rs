//! Manager transport - The single bounded request the client ever makes

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::trace;

use super::backend::StatusReport;
use super::settings::KeepaliveSettings;

/// Ways a ping can fail. All of them read as `BackendState::Unknown`.
#[derive(Debug, Error)]
pub enum PingError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("malformed status body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl PingError {
    /// True for network failures and timeouts, false for bad answers
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Timeout | Self::Transport(_))
    }
}

impl From<reqwest::Error> for PingError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Something that can ask the manager for the backend's state
#[async_trait]
pub trait PingTransport: Send + Sync {
    async fn ping(&self) -> Result<StatusReport, PingError>;

    /// Where requests go, for logging
    fn describe(&self) -> String {
        "manager".to_string()
    }
}

/// Body-less `POST` to the manager's ping endpoint
pub struct HttpPingTransport {
    endpoint: String,
    http_client: reqwest::Client,
}

impl HttpPingTransport {
    pub fn new(settings: &KeepaliveSettings) -> Result<Self, PingError> {
        Self::with_timeout(settings.endpoint.clone(), settings.request_timeout())
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, PingError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            endpoint: endpoint.into(),
            http_client,
        })
    }
}

#[async_trait]
impl PingTransport for HttpPingTransport {
    async fn ping(&self) -> Result<StatusReport, PingError> {
        let response = self.http_client.post(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PingError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        trace!(bytes = body.len(), "Ping response received");
        Ok(serde_json::from_slice(&body)?)
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}
