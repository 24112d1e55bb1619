use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::AppError;

/// Source of "now" for scheduled work. Tests drive tasks with fixed instants.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Work that runs once per scheduler tick.
#[async_trait]
pub trait PeriodicTask: Send + Sync {
    fn name(&self) -> &'static str;
    async fn run_once(&self, now: DateTime<Utc>) -> Result<(), AppError>;
}

/// Runs a [`PeriodicTask`] at a fixed interval.
///
/// Ticks of one scheduler never overlap: the next sleep starts only after the
/// previous run returned. A failed run is logged and the loop continues.
pub struct Scheduler {
    task: Arc<dyn PeriodicTask>,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl Scheduler {
    pub fn new(task: Arc<dyn PeriodicTask>, clock: Arc<dyn Clock>, interval: Duration) -> Self {
        Self {
            task,
            clock,
            interval,
        }
    }

    pub async fn tick(&self) -> Result<(), AppError> {
        self.task.run_once(self.clock.now()).await
    }

    pub async fn start(self) {
        info!(
            "Starting {} scheduler (interval: {:?})",
            self.task.name(),
            self.interval
        );

        loop {
            tokio::time::sleep(self.interval).await;

            if let Err(e) = self.tick().await {
                warn!("{} tick failed: {}", self.task.name(), e);
            }
        }
    }

    /// Spawns the loop; abort the handle to stop it.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.start())
    }
}
