//! Batch orchestration: one independent task per requested photo.
//!
//! - [`task`] - Per-photo pipeline (fetch, acquire, crop, persist) and its state machine

mod task;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use std::sync::Arc;

use tokio::sync::{Semaphore, broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::config::{Config, RequestConfig};
use crate::error::{Error, Result};
use crate::fetcher::CandidateFetcher;
use crate::report::BatchReport;
use crate::types::{Event, TaskId, TaskOutcome, TaskState};

use task::{PhotoTaskContext, run_photo_task};

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Runs photo batches (cloneable - all fields are cheap handles)
#[derive(Clone)]
pub struct PhotoDownloader {
    /// Client settings (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// HTTP client shared by every task (connection pool is internal)
    pub(crate) client: reqwest::Client,
    /// Candidate search against the configured endpoint
    pub(crate) fetcher: CandidateFetcher,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: broadcast::Sender<Event>,
}

impl PhotoDownloader {
    /// Validate `config` and build the shared HTTP client
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        let fetcher = CandidateFetcher::new(client.clone(), &config);
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            config: Arc::new(config),
            client,
            fetcher,
            event_tx,
        })
    }

    /// Subscribe to task and batch events
    ///
    /// Only events sent after subscribing are received. A slow subscriber may
    /// see `RecvError::Lagged`; sending never blocks the tasks.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Client settings this downloader was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Launch `request.photo_count()` tasks and wait for all of them
    ///
    /// Every task is spawned up front. With `max_concurrent_tasks` unset they
    /// all run at once; otherwise a semaphore admits that many at a time. The
    /// returned report holds exactly one outcome per task. A task error never
    /// affects its siblings.
    pub async fn run_batch(&self, request: RequestConfig) -> BatchReport {
        let request = Arc::new(request);
        let photo_count = request.photo_count();
        let limiter = self
            .config
            .max_concurrent_tasks
            .map(|permits| Arc::new(Semaphore::new(permits)));

        tracing::info!(
            photo_count,
            width = request.width(),
            height = request.height(),
            destination = %request.destination().display(),
            max_concurrent_tasks = ?self.config.max_concurrent_tasks,
            "starting photo batch"
        );

        // Unbounded so no task ever waits to report
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel::<TaskOutcome>();

        let mut handles = Vec::with_capacity(photo_count);
        for index in 0..photo_count {
            let ctx = PhotoTaskContext {
                task: TaskId(index),
                request: Arc::clone(&request),
                client: self.client.clone(),
                fetcher: self.fetcher.clone(),
                event_tx: self.event_tx.clone(),
                limiter: limiter.clone(),
            };
            ctx.transition(TaskState::Pending);

            let outcome_tx = outcome_tx.clone();
            let handle = tokio::spawn(async move {
                let outcome = run_photo_task(ctx).await;
                outcome_tx.send(outcome).ok();
            });
            handles.push((TaskId(index), handle));
        }
        drop(outcome_tx);

        let outcomes = self.collect_outcomes(outcome_rx, handles).await;

        let report = BatchReport::new(outcomes);
        tracing::info!(
            saved = report.saved(),
            not_found = report.not_found(),
            failed = report.failures(),
            "photo batch complete"
        );
        self.event_tx
            .send(Event::BatchComplete {
                saved: report.saved(),
                not_found: report.not_found(),
                failed: report.failures(),
            })
            .ok();

        report
    }

    /// Drain reported outcomes, then join every task
    ///
    /// A panicking task drops its sender without reporting; it is recorded as
    /// [`Error::TaskPanicked`] so every handle yields exactly one outcome.
    async fn collect_outcomes(
        &self,
        mut outcome_rx: mpsc::UnboundedReceiver<TaskOutcome>,
        handles: Vec<(TaskId, JoinHandle<()>)>,
    ) -> Vec<TaskOutcome> {
        let mut outcomes = Vec::with_capacity(handles.len());
        while let Some(outcome) = outcome_rx.recv().await {
            outcomes.push(outcome);
        }

        for (task, handle) in handles {
            if let Err(e) = handle.await {
                tracing::error!(task = task.get(), error = %e, "photo task panicked");
                if !outcomes.iter().any(|o| o.task() == task) {
                    self.event_tx
                        .send(Event::TaskStateChanged {
                            task,
                            state: TaskState::Failed,
                        })
                        .ok();
                    outcomes.push(TaskOutcome::Failed {
                        task,
                        error: Error::TaskPanicked(e.to_string()),
                    });
                }
            }
        }

        outcomes
    }
}
