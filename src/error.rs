//! Error types for catfetch
//!
//! Every failure a photo task can hit is a variant of [`Error`]. Errors are
//! local to the task that produced them: the orchestrator records them in the
//! batch report and never retries or propagates them to sibling tasks.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for catfetch operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for catfetch
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "width")
        key: Option<String>,
    },

    /// Transport-level failure talking to the search endpoint
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Search endpoint answered with a non-success status
    #[error("search endpoint returned HTTP status {status}")]
    RemoteService {
        /// The HTTP status code returned
        status: u16,
    },

    /// Search response could not be decoded or had the wrong shape
    #[error("malformed search response: {0}")]
    MalformedResponse(String),

    /// Image bytes could not be downloaded
    #[error("failed to fetch image {url}: {reason}")]
    FetchImage {
        /// The image URL
        url: String,
        /// Why the download failed
        reason: String,
    },

    /// Image bytes were downloaded but could not be decoded
    #[error("failed to decode image {url}: {reason}")]
    Decode {
        /// The image URL
        url: String,
        /// Codec error message
        reason: String,
    },

    /// Requested crop rectangle does not fit inside the source image
    #[error(
        "cannot crop {requested_width}x{requested_height} from a {source_width}x{source_height} image"
    )]
    InvalidCropGeometry {
        /// Requested crop width
        requested_width: u32,
        /// Requested crop height
        requested_height: u32,
        /// Source image width
        source_width: u32,
        /// Source image height
        source_height: u32,
    },

    /// Destination directory, output file or encoder failed
    #[error("failed to save {path}: {reason}")]
    Persist {
        /// The path that could not be written
        path: PathBuf,
        /// Why it could not be written
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A photo task panicked before reporting an outcome
    #[error("photo task panicked: {0}")]
    TaskPanicked(String),
}

impl Error {
    /// Shorthand for a [`Error::Config`] tied to a configuration key
    pub fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }

    /// Machine-readable error code, stable across releases
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Network(_) => "network_error",
            Error::RemoteService { .. } => "remote_service_error",
            Error::MalformedResponse(_) => "malformed_response",
            Error::FetchImage { .. } => "fetch_image_error",
            Error::Decode { .. } => "decode_error",
            Error::InvalidCropGeometry { .. } => "invalid_crop_geometry",
            Error::Persist { .. } => "persist_error",
            Error::Io(_) => "io_error",
            Error::TaskPanicked(_) => "task_panicked",
        }
    }
}
