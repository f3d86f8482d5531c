//! Background worker that runs the keep-alive loop
//!
//! The worker sleeps through the startup delay, then pings the health
//! endpoint forever: one attempt, a logged outcome, a cancellable wait,
//! and around again. Failures never break the loop; cancellation is the
//! only exit. An unexpected failure shortens the next wait to the retry
//! delay so the attempt is repeated sooner.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::config::PingConfig;

use super::probe::{HealthProbe, PingError};

/// Timestamp format for successful-ping log lines
const PING_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One background keep-alive loop. Consumed by `run`; the service spawns a
/// fresh worker per start.
pub(crate) struct PingWorker {
    config: PingConfig,
    probe: Arc<dyn HealthProbe>,
    cancel: CancellationToken,
}

impl PingWorker {
    pub(crate) fn new(
        config: PingConfig,
        probe: Arc<dyn HealthProbe>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            probe,
            cancel,
        }
    }

    /// Run the keep-alive loop until cancelled
    #[instrument(
        name = "ping.worker",
        skip(self),
        fields(target = %self.config.target_url, interval_secs = self.config.interval.as_secs())
    )]
    pub(crate) async fn run(self) {
        tracing::info!("Keep-alive worker starting");

        // Give the monitored service time to finish booting
        if self.wait(self.config.startup_delay).await {
            loop {
                let delay = tokio::select! {
                    biased;
                    _ = self.cancel.cancelled() => break,
                    delay = self.attempt() => delay,
                };
                if !self.wait(delay).await {
                    break;
                }
            }
        }

        tracing::info!("Keep-alive worker stopped");
    }

    /// Make one ping attempt and log its outcome. Returns the wait before
    /// the next attempt: the normal interval, or the shorter retry delay
    /// after an unexpected failure.
    #[instrument(name = "ping.attempt", skip(self), fields(duration_ms))]
    async fn attempt(&self) -> Duration {
        let start = Instant::now();
        let result = self.probe.ping().await;
        tracing::Span::current().record("duration_ms", start.elapsed().as_millis() as u64);

        match result {
            Ok(()) => {
                tracing::info!(
                    at = %Utc::now().format(PING_TIMESTAMP_FORMAT),
                    "Keep-alive ping successful"
                );
                self.config.interval
            }
            Err(PingError::UnexpectedStatus(status)) => {
                tracing::warn!(%status, "Keep-alive ping returned unexpected status");
                self.config.interval
            }
            Err(PingError::Transport(err)) => {
                tracing::warn!(error = %err, "Keep-alive ping failed");
                self.config.interval
            }
            Err(PingError::Unexpected(err)) => {
                tracing::error!(error = %err, "Unexpected error during keep-alive ping");
                self.config.retry_delay
            }
        }
    }

    /// Cancellable sleep. Returns false if cancelled before the delay elapsed.
    async fn wait(&self, delay: Duration) -> bool {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }
}
