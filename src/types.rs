//! Core types and events for catfetch

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Error;

/// Index of a photo task within its batch
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub usize);

impl TaskId {
    /// Get the inner index
    pub fn get(&self) -> usize {
        self.0
    }
}

impl From<usize> for TaskId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One entry of the search endpoint's JSON array
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Photo identifier assigned by the search API
    pub id: String,
    /// Where the full-size photo can be downloaded
    pub url: String,
    /// Source width as reported by the API (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Source height as reported by the API (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

/// Lifecycle of a single photo task
///
/// `Pending -> Fetching -> Acquiring -> Cropping -> Persisting`, ending in
/// exactly one of the three terminal states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Spawned, waiting to run
    Pending,
    /// Querying the search endpoint for a candidate
    Fetching,
    /// Downloading and decoding the candidate image
    Acquiring,
    /// Cutting the centered rectangle
    Cropping,
    /// Writing the JPEG to disk
    Persisting,
    /// Photo saved
    Succeeded,
    /// Search never returned a usable image URL
    NoCandidateFound,
    /// Any stage returned an error
    Failed,
}

impl TaskState {
    /// True for states no task ever leaves
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Succeeded | TaskState::NoCandidateFound | TaskState::Failed
        )
    }
}

/// What a photo task ended with; exactly one per task
#[derive(Debug)]
pub enum TaskOutcome {
    /// Cropped photo written to `path`
    Saved {
        /// Task that produced the photo
        task: TaskId,
        /// Candidate id from the search API
        id: String,
        /// Where the photo was written
        path: PathBuf,
    },
    /// Every search attempt returned a URL without a recognized image extension
    NoCandidateFound {
        /// Task that gave up
        task: TaskId,
        /// How many searches were made
        attempts: u32,
    },
    /// The task failed at some stage
    Failed {
        /// Task that failed
        task: TaskId,
        /// What went wrong
        error: Error,
    },
}

impl TaskOutcome {
    /// Task this outcome belongs to
    pub fn task(&self) -> TaskId {
        match self {
            TaskOutcome::Saved { task, .. }
            | TaskOutcome::NoCandidateFound { task, .. }
            | TaskOutcome::Failed { task, .. } => *task,
        }
    }

    /// Terminal state matching this outcome
    pub fn state(&self) -> TaskState {
        match self {
            TaskOutcome::Saved { .. } => TaskState::Succeeded,
            TaskOutcome::NoCandidateFound { .. } => TaskState::NoCandidateFound,
            TaskOutcome::Failed { .. } => TaskState::Failed,
        }
    }

    /// True only for [`TaskOutcome::Failed`]
    pub fn is_failure(&self) -> bool {
        matches!(self, TaskOutcome::Failed { .. })
    }
}

/// Events emitted while a batch runs
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A task moved to a new state
    TaskStateChanged {
        /// Task ID
        task: TaskId,
        /// State just entered
        state: TaskState,
    },

    /// A search attempt returned a URL that is not a recognized image
    CandidateRejected {
        /// Task ID
        task: TaskId,
        /// Attempt number (1-based)
        attempt: u32,
        /// The rejected URL
        url: String,
    },

    /// Every task reached a terminal state
    BatchComplete {
        /// Photos written
        saved: usize,
        /// Tasks that found no usable candidate
        not_found: usize,
        /// Tasks that failed
        failed: usize,
    },
}
