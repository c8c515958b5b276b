//! Periodic execution of the refresh job.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::info;

use crate::job::{RefreshJob, RefreshSummary};

/// Runs the refresh job at a fixed interval.
pub struct Scheduler {
    job: Arc<RefreshJob>,
    interval: Duration,
}

impl Scheduler {
    pub fn new(job: Arc<RefreshJob>, interval: Duration) -> Self {
        Self { job, interval }
    }

    /// Run the job once.
    pub async fn run_once(&self) -> RefreshSummary {
        self.job.run().await
    }

    /// Run immediately, then every interval until a shutdown signal arrives.
    pub async fn run_forever(&self, mut shutdown: broadcast::Receiver<()>) {
        info!(interval_secs = self.interval.as_secs(), "Starting refresh scheduler");

        loop {
            self.job.run().await;

            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Shutting down scheduler");
                    break;
                }
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }
}
