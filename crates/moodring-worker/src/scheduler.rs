//! Cron scheduler for the periodic expiry sweep.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing::{debug, info};

use moodring_core::AppError;
use moodring_engine::SessionStore;

/// Cron-based scheduler for background maintenance.
pub struct CronScheduler {
    scheduler: JobScheduler,
    store: Arc<SessionStore>,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler over the session store.
    pub async fn new(store: Arc<SessionStore>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;
        Ok(Self { scheduler, store })
    }

    /// Register the expiry sweep at the given interval.
    pub async fn register_expiry_sweep(&self, interval_minutes: u64) -> Result<(), AppError> {
        let store = Arc::clone(&self.store);
        let schedule = format!("0 */{} * * * *", interval_minutes);

        let job = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let store = Arc::clone(&store);
            Box::pin(async move {
                debug!("Running expiry sweep");
                let purged = store.cleanup_expired();
                if purged > 0 {
                    info!(purged, "Expiry sweep removed sessions");
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create expiry sweep: {}", e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add expiry sweep: {}", e)))?;

        info!(interval_minutes, "Registered: expiry sweep");
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;
        info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;
        info!("Cron scheduler shut down");
        Ok(())
    }
}
