//! Recurring job scheduler.
//!
//! Jobs are registered as a name, an interval and a handler future. Each job
//! runs on its own detached tokio task; a failing invocation is logged and
//! the next tick fires regardless.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::error::AppResult;

/// Trigger description for a recurring job.
#[derive(Debug, Clone, Copy)]
pub struct JobSchedule {
    pub name: &'static str,
    pub every: Duration,
}

#[derive(Default)]
pub struct Scheduler {
    handles: Vec<JoinHandle<()>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job. The first run happens one full period after startup.
    pub fn register<F, Fut>(&mut self, schedule: JobSchedule, job: F)
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = AppResult<()>> + Send,
    {
        tracing::info!(
            job = schedule.name,
            every_secs = schedule.every.as_secs(),
            "Registered scheduled job"
        );

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(schedule.every);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; consume it so the job
            // waits a full period before its first run.
            interval.tick().await;

            loop {
                interval.tick().await;
                if let Err(e) = job().await {
                    tracing::error!(job = schedule.name, error = %e, "Scheduled job failed");
                }
            }
        });

        self.handles.push(handle);
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}
