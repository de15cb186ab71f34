//! # Refresh Scheduler
//!
//! Drives the `RefreshPipeline` and owns the publish decision.
//!
//! ## Lifecycle of one trigger:
//! 1.  **Idle → fetching**: take the in-flight guard; if another run holds it the
//!     trigger is skipped.
//! 2.  **Fetching**: the pipeline runs on its own task, so a panic inside it is
//!     contained and reported as `RefreshError::Task`.
//! 3.  **Publish or discard**: a finished run is swapped into the cache, unless it
//!     is empty and empty publication is disabled. A failed run leaves the cache
//!     as it was.
//!
//! `start` registers the trigger as a cron job and fires it once immediately
//! without waiting for it.

use super::cache::JoinedCache;
use super::error::RefreshError;
use super::pipeline::RefreshPipeline;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, error, info, warn};

#[derive(Clone)]
pub struct RefreshScheduler {
    pipeline: Arc<RefreshPipeline>,
    cache: Arc<JoinedCache>,
    publish_empty: bool,
    running: Arc<Mutex<()>>,
}

impl RefreshScheduler {
    pub fn new(pipeline: Arc<RefreshPipeline>, cache: Arc<JoinedCache>, publish_empty: bool) -> Self {
        Self {
            pipeline,
            cache,
            publish_empty,
            running: Arc::new(Mutex::new(())),
        }
    }

    pub fn cache(&self) -> &Arc<JoinedCache> {
        &self.cache
    }

    /// Runs one refresh and publishes its result.
    ///
    /// Returns the number of partners published.
    ///
    /// # Errors
    /// * `InProgress` when another refresh is still running.
    /// * `Task` when the pipeline task panicked or was cancelled.
    /// * `EmptySuppressed` when the run joined nothing and empty publication is off.
    pub async fn run_once(&self) -> Result<usize, RefreshError> {
        let _in_flight = self
            .running
            .try_lock()
            .map_err(|_| RefreshError::InProgress)?;

        let pipeline = Arc::clone(&self.pipeline);
        let joined = tokio::spawn(async move { pipeline.run().await }).await?;

        if joined.is_empty() && !self.publish_empty {
            return Err(RefreshError::EmptySuppressed);
        }

        let count = joined.len();
        self.cache.publish(joined);
        info!(partners = count, "Published refreshed partner directory.");
        Ok(count)
    }

    /// `run_once` with the outcome logged instead of returned.
    pub async fn trigger(&self) {
        match self.run_once().await {
            Ok(_) => {}
            Err(RefreshError::InProgress) => {
                warn!("Refresh still running; skipping this trigger.")
            }
            Err(RefreshError::EmptySuppressed) => {
                warn!("Refresh joined zero partners; keeping the previous cache.")
            }
            Err(e) => error!(error = %e, "Refresh failed; keeping the previous cache."),
        }
    }

    /// Kicks off the startup refresh in the background and schedules the periodic
    /// one. The returned scheduler is already running; shut it down on exit.
    ///
    /// # Errors
    /// An invalid cron expression or a scheduler that fails to start.
    pub async fn start(&self, cron: &str) -> Result<JobScheduler, RefreshError> {
        let scheduler = JobScheduler::new().await?;
        let driver = self.clone();
        let job = Job::new_async(cron, move |uuid, mut l| {
            let driver = driver.clone();
            Box::pin(async move {
                driver.trigger().await;
                match l.next_tick_for_job(uuid).await {
                    Ok(Some(ts)) => debug!("Next refresh at {:?}", ts),
                    _ => warn!("Could not get next tick for the refresh job"),
                }
            })
        })?;

        let initial = self.clone();
        tokio::spawn(async move { initial.trigger().await });

        scheduler.add(job).await?;
        scheduler.start().await?;

        info!(cron, "Refresh scheduler started.");
        Ok(scheduler)
    }
}

#[cfg(test)]
mod tests {
    use super::super::pipeline::testing::StaticListing;
    use super::*;
    use crate::ingestors::BatchFetcher;
    use crate::retrieve::PageSource;
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn scheduler_over(
        partners: StaticListing,
        solutions: StaticListing,
        publish_empty: bool,
    ) -> RefreshScheduler {
        let partners: Arc<dyn PageSource> = Arc::new(partners);
        let solutions: Arc<dyn PageSource> = Arc::new(solutions);
        let pipeline = RefreshPipeline::new(
            BatchFetcher::new(partners, 10, 2, Duration::from_secs(50)),
            BatchFetcher::new(solutions, 10, 2, Duration::from_secs(50)),
        );
        RefreshScheduler::new(Arc::new(pipeline), Arc::new(JoinedCache::new()), publish_empty)
    }

    fn two_partners() -> StaticListing {
        StaticListing::partners(vec![
            json!({"Id": "1", "Name": "Acme"}),
            json!({"Id": "2", "Name": "Globex"}),
        ])
    }

    #[tokio::test]
    async fn successful_run_publishes() {
        let scheduler = scheduler_over(two_partners(), StaticListing::solutions(vec![]), true);

        assert_eq!(scheduler.run_once().await.unwrap(), 2);
        let snapshot = scheduler.cache().snapshot();
        assert!(snapshot.is_loaded());
        assert_eq!(snapshot.entries.len(), 2);
    }

    #[tokio::test]
    async fn empty_run_is_published_by_default() {
        let scheduler = scheduler_over(
            StaticListing::partners(vec![]),
            StaticListing::solutions(vec![]),
            true,
        );

        assert_eq!(scheduler.run_once().await.unwrap(), 0);
        assert!(scheduler.cache().snapshot().is_loaded());
    }

    #[tokio::test]
    async fn empty_run_can_be_suppressed() {
        let scheduler = scheduler_over(
            StaticListing::partners(vec![]),
            StaticListing::solutions(vec![]),
            false,
        );
        scheduler.cache().publish(vec![]);
        let before = scheduler.cache().snapshot();

        let result = scheduler.run_once().await;

        assert!(matches!(result, Err(RefreshError::EmptySuppressed)));
        assert!(Arc::ptr_eq(&before, &scheduler.cache().snapshot()));
    }

    #[tokio::test]
    async fn panicking_pipeline_leaves_cache_untouched() {
        let mut partners = two_partners();
        partners.panics = true;
        let scheduler = scheduler_over(partners, StaticListing::solutions(vec![]), true);

        let result = scheduler.run_once().await;

        assert!(matches!(result, Err(RefreshError::Task(_))));
        assert!(!scheduler.cache().snapshot().is_loaded());

        // The guard is released, so the next trigger may run.
        assert!(!matches!(scheduler.run_once().await, Err(RefreshError::InProgress)));
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_trigger_is_skipped() {
        let mut partners = two_partners();
        partners.delay = Some(Duration::from_secs(5));
        let scheduler = scheduler_over(partners, StaticListing::solutions(vec![]), true);

        let (first, second) = tokio::join!(scheduler.run_once(), scheduler.run_once());

        assert_eq!(first.unwrap(), 2);
        assert!(matches!(second, Err(RefreshError::InProgress)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn start_runs_an_immediate_refresh() {
        let partners = Arc::new(two_partners());
        let source: Arc<dyn PageSource> = partners.clone();
        let pipeline = RefreshPipeline::new(
            BatchFetcher::new(source, 10, 2, Duration::from_secs(50)),
            BatchFetcher::new(
                Arc::new(StaticListing::solutions(vec![])),
                10,
                2,
                Duration::from_secs(50),
            ),
        );
        let scheduler = RefreshScheduler::new(Arc::new(pipeline), Arc::new(JoinedCache::new()), true);

        let mut jobs = scheduler.start("0 0 0 1 1 *").await.unwrap();
        for _ in 0..50 {
            if scheduler.cache().snapshot().is_loaded() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(scheduler.cache().len(), 2);
        assert!(partners.calls.load(Ordering::SeqCst) >= 1);
        jobs.shutdown().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn invalid_cron_is_rejected() {
        let scheduler = scheduler_over(two_partners(), StaticListing::solutions(vec![]), true);
        assert!(scheduler.start("every three minutes").await.is_err());
        assert!(!scheduler.cache().snapshot().is_loaded());
    }
}
