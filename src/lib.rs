//! # catfetch
//!
//! Fetch a batch of photos from an image search API, crop each one to a fixed
//! size around its center, and save them as JPEG files.
//!
//! Every requested photo is handled by its own task:
//! search for a candidate, download and decode it, crop it, write it out. A
//! task that fails is reported at the end but never affects its siblings.
//!
//! ## Quick Start
//!
//! ```no_run
//! use catfetch::{Config, PhotoDownloader, RequestConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = PhotoDownloader::new(Config::default())?;
//!     let request = RequestConfig::new(300, 200, 5, "cats")?;
//!
//!     let report = downloader.run_batch(request).await;
//!     report.write_to(&mut std::io::stdout())?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Image download and decode
pub mod acquire;
/// Configuration types
pub mod config;
/// Centered cropping
pub mod crop;
/// Batch orchestration
pub mod downloader;
/// Error types
pub mod error;
/// Candidate search
pub mod fetcher;
/// JPEG output
pub mod persist;
/// Interactive input
pub mod prompt;
/// Batch report
pub mod report;
/// Bounded candidate retry
pub mod retry;
/// Core types and events
pub mod types;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::{Config, RequestConfig};
pub use downloader::PhotoDownloader;
pub use error::{Error, Result};
pub use fetcher::{CandidateFetcher, CandidateLookup};
pub use report::BatchReport;
pub use types::{CandidateRecord, Event, TaskId, TaskOutcome, TaskState};
