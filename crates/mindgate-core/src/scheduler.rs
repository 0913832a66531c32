//! Periodic sweep of expired intentions.
//!
//! Uses tokio-cron-scheduler to call `sweep()` at a fixed interval. Nothing
//! prevents a scheduled sweep from overlapping a manual one; sweeping is
//! idempotent.

use std::time::Duration;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, info};

use crate::intentions::IntentionService;

/// Scheduler running [`IntentionService::sweep`] periodically.
pub struct SweepScheduler {
    scheduler: JobScheduler,
    intentions: IntentionService,
    interval: Duration,
}

impl SweepScheduler {
    /// Create a scheduler. Call `start()` to begin sweeping.
    pub async fn new(
        intentions: IntentionService,
        interval: Duration,
    ) -> Result<Self, JobSchedulerError> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            scheduler,
            intentions,
            interval: interval.max(Duration::from_secs(1)),
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Register the repeated job and start the scheduler.
    pub async fn start(&self) -> Result<(), JobSchedulerError> {
        let intentions = self.intentions.clone();

        let job = Job::new_repeated_async(self.interval, move |_uuid, _lock| {
            let intentions = intentions.clone();
            Box::pin(async move {
                debug!("Running periodic intention sweep");
                let removed = intentions.sweep().await;
                if removed > 0 {
                    info!(removed, "Periodic sweep removed expired intentions");
                }
            })
        })?;

        self.scheduler.add(job).await?;
        self.scheduler.start().await?;

        info!(interval_secs = self.interval.as_secs(), "Sweep scheduler started");
        Ok(())
    }

    /// Stop the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), JobSchedulerError> {
        info!("Shutting down sweep scheduler");
        self.scheduler.shutdown().await
    }

    /// Sweep immediately, outside the schedule.
    pub async fn run_now(&self) -> usize {
        self.intentions.sweep().await
    }
}
