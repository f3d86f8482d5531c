//! Ping attempt outcomes and the HTTP probe
//!
//! A ping attempt either succeeds (HTTP 200) or fails with one of a small,
//! closed set of error kinds. The kind decides the worker's next delay:
//! non-200 responses and transport failures keep the normal interval, while
//! anything else triggers the shorter retry delay. `HealthProbe` is the seam
//! between the worker loop and the network; `HttpProbe` is the production
//! implementation backed by a reqwest client built once at startup.

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::config::{PingConfig, PING_USER_AGENT};

/// Error building the HTTP probe
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Why a ping attempt failed.
///
/// The variants map to the three handled failure categories: an endpoint that
/// answered with the wrong status, a request that never completed, and
/// everything else.
#[derive(Debug, thiserror::Error)]
pub enum PingError {
    /// The endpoint answered with a status other than 200 OK
    #[error("ping returned status {0}")]
    UnexpectedStatus(StatusCode),
    /// The request never completed: timeout, connection refused, DNS failure
    #[error("ping failed: {0}")]
    Transport(String),
    /// Any other failure while making the attempt
    #[error("unexpected ping error: {0}")]
    Unexpected(String),
}

impl PingError {
    /// Sort a reqwest error into the transport or unexpected tier.
    /// Timeouts and connection-level failures are routine; anything else
    /// (request construction, redirects, body handling) is not.
    fn from_request_error(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            PingError::Transport(err.to_string())
        } else {
            PingError::Unexpected(err.to_string())
        }
    }
}

/// A single keep-alive attempt against the health endpoint
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<(), PingError>;
}

/// Probe that issues an HTTP GET to the configured health endpoint
pub struct HttpProbe {
    client: reqwest::Client,
    ping_url: String,
}

impl HttpProbe {
    /// Create the probe, building its HTTP client with the configured
    /// request timeout and the fixed keep-alive user agent.
    pub fn new(config: &PingConfig) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(PING_USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            ping_url: config.ping_url(),
        })
    }
}

#[async_trait]
impl HealthProbe for HttpProbe {
    async fn ping(&self) -> Result<(), PingError> {
        let response = self
            .client
            .get(&self.ping_url)
            .send()
            .await
            .map_err(PingError::from_request_error)?;

        let status = response.status();
        if status == StatusCode::OK {
            Ok(())
        } else {
            Err(PingError::UnexpectedStatus(status))
        }
    }
}
