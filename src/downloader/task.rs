//! Single photo task: fetch a candidate, download it, crop it, save it.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore, broadcast};

use crate::acquire::acquire_image;
use crate::config::RequestConfig;
use crate::crop::crop_centered;
use crate::error::Result;
use crate::fetcher::{CandidateFetcher, CandidateLookup};
use crate::persist::persist;
use crate::types::{Event, TaskId, TaskOutcome, TaskState};

/// Everything one photo task needs; nothing here is shared mutably
pub(crate) struct PhotoTaskContext {
    pub(crate) task: TaskId,
    pub(crate) request: Arc<RequestConfig>,
    pub(crate) client: reqwest::Client,
    pub(crate) fetcher: CandidateFetcher,
    pub(crate) event_tx: broadcast::Sender<Event>,
    pub(crate) limiter: Option<Arc<Semaphore>>,
}

impl PhotoTaskContext {
    /// Record entry into `state`
    pub(crate) fn transition(&self, state: TaskState) {
        tracing::trace!(task = self.task.get(), ?state, "task state changed");
        self.event_tx
            .send(Event::TaskStateChanged {
                task: self.task,
                state,
            })
            .ok();
    }

    async fn acquire_permit(&self) -> Option<OwnedSemaphorePermit> {
        match &self.limiter {
            // acquire_owned only fails on a closed semaphore
            Some(limiter) => Arc::clone(limiter).acquire_owned().await.ok(),
            None => None,
        }
    }
}

/// Drive one task to exactly one terminal state
pub(crate) async fn run_photo_task(ctx: PhotoTaskContext) -> TaskOutcome {
    let _permit = ctx.acquire_permit().await;
    let task = ctx.task;

    let outcome = run_stages(&ctx)
        .await
        .unwrap_or_else(|error| TaskOutcome::Failed { task, error });
    ctx.transition(outcome.state());

    match &outcome {
        TaskOutcome::Saved { id, path, .. } => {
            tracing::info!(task = task.get(), candidate_id = %id, path = %path.display(), "photo saved");
        }
        TaskOutcome::NoCandidateFound { attempts, .. } => {
            tracing::warn!(task = task.get(), attempts, "no usable photo found");
        }
        TaskOutcome::Failed { error, .. } => {
            tracing::error!(task = task.get(), code = error.error_code(), error = %error, "photo task failed");
        }
    }

    outcome
}

async fn run_stages(ctx: &PhotoTaskContext) -> Result<TaskOutcome> {
    let task = ctx.task;

    ctx.transition(TaskState::Fetching);
    let lookup = ctx
        .fetcher
        .fetch_candidate_with(|attempt, url| {
            ctx.event_tx
                .send(Event::CandidateRejected {
                    task,
                    attempt,
                    url: url.to_string(),
                })
                .ok();
        })
        .await?;

    let record = match lookup {
        CandidateLookup::Found { record, .. } => record,
        CandidateLookup::NotFound { attempts } => {
            return Ok(TaskOutcome::NoCandidateFound { task, attempts });
        }
    };
    tracing::debug!(task = task.get(), candidate_id = %record.id, url = %record.url, "candidate selected");

    ctx.transition(TaskState::Acquiring);
    let image = acquire_image(&ctx.client, &record.url).await?;

    ctx.transition(TaskState::Cropping);
    let cropped = crop_centered(&image, ctx.request.width(), ctx.request.height())?;
    drop(image);

    ctx.transition(TaskState::Persisting);
    let path = persist(&cropped, ctx.request.destination(), &record.id).await?;

    Ok(TaskOutcome::Saved {
        task,
        id: record.id,
        path,
    })
}
