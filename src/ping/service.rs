//! Keep-alive service owning the background worker
//!
//! `KeepAlive` holds the resolved configuration, the probe, and at most one
//! running worker task. Starting spawns the worker; stopping cancels it and
//! waits for it to exit, so teardown is deterministic. Both operations are
//! idempotent.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::PingConfig;

use super::probe::{HealthProbe, HttpProbe, ProbeError};
use super::worker::PingWorker;

/// Cancellation token and join handle for a spawned worker
struct WorkerHandle {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Keep-alive service. Pings the target's health endpoint in the background
/// until stopped.
pub struct KeepAlive {
    config: PingConfig,
    probe: Arc<dyn HealthProbe>,
    worker: Option<WorkerHandle>,
}

impl KeepAlive {
    /// Create a service that pings over HTTP
    pub fn new(config: PingConfig) -> Result<Self, ProbeError> {
        let probe = Arc::new(HttpProbe::new(&config)?);
        Ok(Self::with_probe(config, probe))
    }

    /// Create a service with a custom probe implementation
    pub fn with_probe(config: PingConfig, probe: Arc<dyn HealthProbe>) -> Self {
        Self {
            config,
            probe,
            worker: None,
        }
    }

    /// Spawn the background worker and return immediately. A no-op if the
    /// worker is already running; at most one worker exists at a time.
    pub fn start(&mut self) {
        if self.worker.is_some() {
            tracing::debug!("Keep-alive service already running");
            return;
        }

        let cancel = CancellationToken::new();
        let worker = PingWorker::new(self.config.clone(), self.probe.clone(), cancel.clone());
        let handle = tokio::spawn(worker.run());
        self.worker = Some(WorkerHandle { cancel, handle });

        tracing::info!(
            target = %self.config.target_url,
            interval_secs = self.config.interval.as_secs(),
            "Keep-alive service started"
        );
    }

    /// Cancel the worker and wait for it to exit. A no-op if the worker is
    /// not running.
    pub async fn stop(&mut self) {
        let worker = match self.worker.take() {
            Some(worker) => worker,
            None => return,
        };

        worker.cancel.cancel();
        if let Err(e) = worker.handle.await {
            tracing::error!(error = %e, "Keep-alive worker ended abnormally");
        }

        tracing::info!("Keep-alive service stopped");
    }

    /// Whether the background worker is currently running
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}
