use thiserror::Error;
use tokio::task::JoinError;
use tokio_cron_scheduler::JobSchedulerError;

/// Why a refresh did not replace the cache.
#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("a refresh is already in progress")]
    InProgress,

    #[error("refresh joined zero partners and empty publication is disabled")]
    EmptySuppressed,

    #[error("refresh task failed: {0}")]
    Task(#[from] JoinError),

    #[error("scheduler error: {0}")]
    Scheduler(#[from] JobSchedulerError),
}
