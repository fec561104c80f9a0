//! Configuration types for catfetch

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Semaphore;

/// Default search endpoint; returns a JSON array with one random cat photo
pub const DEFAULT_SEARCH_URL: &str = "https://api.thecatapi.com/v1/images/search";

/// Largest batch a single request may ask for
pub const MAX_PHOTO_COUNT: usize = 10_000;

/// What to fetch and where to put it
///
/// Built once from validated input and shared read-only (behind an `Arc`) by
/// every photo task in the batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestConfig {
    width: u32,
    height: u32,
    photo_count: usize,
    destination: PathBuf,
}

impl RequestConfig {
    /// Validate and build a request
    ///
    /// Width, height and photo count must all be at least 1, the photo count
    /// at most [`MAX_PHOTO_COUNT`], and the destination path must not be empty.
    pub fn new(
        width: u32,
        height: u32,
        photo_count: usize,
        destination: impl Into<PathBuf>,
    ) -> Result<Self> {
        let destination = destination.into();

        if width == 0 {
            return Err(Error::config("width", "width must be at least 1"));
        }
        if height == 0 {
            return Err(Error::config("height", "height must be at least 1"));
        }
        if photo_count == 0 {
            return Err(Error::config("photo_count", "photo count must be at least 1"));
        }
        if photo_count > MAX_PHOTO_COUNT {
            return Err(Error::config(
                "photo_count",
                format!("photo count must be at most {MAX_PHOTO_COUNT}"),
            ));
        }
        if destination.as_os_str().is_empty() {
            return Err(Error::config(
                "destination",
                "destination path must not be empty",
            ));
        }

        Ok(Self {
            width,
            height,
            photo_count,
            destination,
        })
    }

    /// Crop width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Crop height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of photo tasks to launch
    pub fn photo_count(&self) -> usize {
        self.photo_count
    }

    /// Directory the cropped photos are written to
    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

/// Client-side settings for talking to the search API
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Search endpoint URL (default: thecatapi.com image search)
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// API key sent as `x-api-key` when present
    #[serde(default)]
    pub api_key: Option<String>,

    /// User-Agent header for every outbound request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Upper bound on photo tasks running at once (None = one task per photo, all at once)
    ///
    /// Every task is still spawned up front; with a bound set, tasks beyond the
    /// limit wait on a semaphore permit before touching the network.
    #[serde(default)]
    pub max_concurrent_tasks: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            api_key: None,
            user_agent: default_user_agent(),
            max_concurrent_tasks: None,
        }
    }
}

impl Config {
    /// Check the settings for values that could never work
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.search_url).map_err(|e| {
            Error::config("search_url", format!("invalid search URL '{}': {e}", self.search_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(
                "search_url",
                format!("unsupported URL scheme '{}'", url.scheme()),
            ));
        }

        match self.max_concurrent_tasks {
            Some(0) => {
                return Err(Error::config(
                    "max_concurrent_tasks",
                    "max_concurrent_tasks must be at least 1",
                ));
            }
            Some(permits) if permits > Semaphore::MAX_PERMITS => {
                return Err(Error::config(
                    "max_concurrent_tasks",
                    format!("max_concurrent_tasks must be at most {}", Semaphore::MAX_PERMITS),
                ));
            }
            _ => {}
        }

        if self
            .api_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            return Err(Error::config("api_key", "api_key must not be blank"));
        }

        Ok(())
    }
}

fn default_search_url() -> String {
    DEFAULT_SEARCH_URL.to_string()
}

fn default_user_agent() -> String {
    format!("catfetch/{}", env!("CARGO_PKG_VERSION"))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_accepts_minimum_values() {
        let request = RequestConfig::new(1, 1, 1, "out").unwrap();
        assert_eq!(request.width(), 1);
        assert_eq!(request.height(), 1);
        assert_eq!(request.photo_count(), 1);
        assert_eq!(request.destination(), Path::new("out"));
    }

    #[test]
    fn request_accepts_largest_batch() {
        let request = RequestConfig::new(1, 1, MAX_PHOTO_COUNT, "out").unwrap();
        assert_eq!(request.photo_count(), MAX_PHOTO_COUNT);
    }

    #[test]
    fn request_rejects_zero_fields_with_key() {
        let cases = [
            (RequestConfig::new(0, 10, 1, "out"), "width"),
            (RequestConfig::new(10, 0, 1, "out"), "height"),
            (RequestConfig::new(10, 10, 0, "out"), "photo_count"),
            (RequestConfig::new(10, 10, MAX_PHOTO_COUNT + 1, "out"), "photo_count"),
            (RequestConfig::new(10, 10, 1usize << 62, "out"), "photo_count"),
            (RequestConfig::new(10, 10, 1, ""), "destination"),
        ];

        for (result, expected_key) in cases {
            match result {
                Err(Error::Config { key, .. }) => {
                    assert_eq!(key.as_deref(), Some(expected_key));
                }
                other => panic!("expected config error for {expected_key}, got {other:?}"),
            }
        }
    }

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.search_url, DEFAULT_SEARCH_URL);
        assert!(config.max_concurrent_tasks.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn config_rejects_bad_values() {
        let bad_url = Config {
            search_url: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(bad_url.validate(), Err(Error::Config { .. })));

        let ftp = Config {
            search_url: "ftp://example.com/search".into(),
            ..Config::default()
        };
        assert!(matches!(ftp.validate(), Err(Error::Config { .. })));

        let zero_workers = Config {
            max_concurrent_tasks: Some(0),
            ..Config::default()
        };
        assert!(matches!(zero_workers.validate(), Err(Error::Config { .. })));

        let too_many_workers = Config {
            max_concurrent_tasks: Some(usize::MAX),
            ..Config::default()
        };
        match too_many_workers.validate() {
            Err(Error::Config { key, .. }) => {
                assert_eq!(key.as_deref(), Some("max_concurrent_tasks"));
            }
            other => panic!("expected config error, got {other:?}"),
        }

        let largest_workers = Config {
            max_concurrent_tasks: Some(Semaphore::MAX_PERMITS),
            ..Config::default()
        };
        largest_workers.validate().unwrap();

        let blank_key = Config {
            api_key: Some("  ".into()),
            ..Config::default()
        };
        assert!(matches!(blank_key.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"max_concurrent_tasks": 4}"#).unwrap();
        assert_eq!(config.search_url, DEFAULT_SEARCH_URL);
        assert_eq!(config.max_concurrent_tasks, Some(4));
        assert!(config.user_agent.starts_with("catfetch/"));
    }
}
