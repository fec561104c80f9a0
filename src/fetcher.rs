//! Candidate selection against the photo search endpoint
//!
//! Each search returns a JSON array that must hold exactly one record. A
//! record whose URL is not a recognized image is rejected and the search is
//! repeated, up to [`MAX_CANDIDATE_ATTEMPTS`] times in total.

use image::ImageFormat;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::retry::{MAX_CANDIDATE_ATTEMPTS, RetryOutcome, retry_until_accepted};
use crate::types::CandidateRecord;

/// Header carrying the search API key
const HEADER_API_KEY: &str = "x-api-key";

/// What a candidate search settled on
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CandidateLookup {
    /// A record with a recognized image URL
    Found {
        /// The accepted record
        record: CandidateRecord,
        /// Searches made, including the accepted one
        attempts: u32,
    },
    /// Every search returned a URL without a recognized image extension
    NotFound {
        /// Searches made
        attempts: u32,
    },
}

/// Image format implied by a URL's extension, if it is one we decode
///
/// Matches `.jpg` and `.jpeg` case-insensitively at the very end of the URL.
pub fn recognized_image_format(url: &str) -> Option<ImageFormat> {
    let lower = url.to_ascii_lowercase();
    if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        Some(ImageFormat::Jpeg)
    } else {
        None
    }
}

/// Queries the search endpoint for one usable candidate
#[derive(Clone, Debug)]
pub struct CandidateFetcher {
    client: reqwest::Client,
    search_url: String,
    api_key: Option<String>,
}

impl CandidateFetcher {
    /// Create a fetcher that shares `client`'s connection pool
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            search_url: config.search_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Search until a record with a recognized image URL comes back
    ///
    /// Transport failures, non-2xx statuses and malformed bodies end the search
    /// with an error at once. Only an unrecognized extension is retried.
    pub async fn fetch_candidate(&self) -> Result<CandidateLookup> {
        self.fetch_candidate_with(|_, _| {}).await
    }

    /// Like [`fetch_candidate`](Self::fetch_candidate), calling `on_reject`
    /// with the attempt number and URL of every rejected record
    pub async fn fetch_candidate_with<F>(&self, on_reject: F) -> Result<CandidateLookup>
    where
        F: Fn(u32, &str),
    {
        let on_reject = &on_reject;

        let outcome = retry_until_accepted(MAX_CANDIDATE_ATTEMPTS, |attempt| async move {
            let record = self.search_once().await?;
            if recognized_image_format(&record.url).is_some() {
                return Ok(Some(record));
            }

            tracing::debug!(
                attempt,
                candidate_id = %record.id,
                url = %record.url,
                "candidate is not a recognized image"
            );
            on_reject(attempt, &record.url);
            Ok::<_, Error>(None)
        })
        .await?;

        Ok(match outcome {
            RetryOutcome::Accepted { value, attempts } => CandidateLookup::Found {
                record: value,
                attempts,
            },
            RetryOutcome::Exhausted { attempts } => CandidateLookup::NotFound { attempts },
        })
    }

    /// One GET against the search endpoint, validated down to a single record
    async fn search_once(&self) -> Result<CandidateRecord> {
        let mut request = self.client.get(&self.search_url);
        if let Some(key) = &self.api_key {
            request = request.header(HEADER_API_KEY, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), url = %self.search_url, "search endpoint failed");
            return Err(Error::RemoteService {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let records: Vec<CandidateRecord> = serde_json::from_slice(&body)
            .map_err(|e| Error::MalformedResponse(format!("invalid JSON body: {e}")))?;

        if records.len() != 1 {
            return Err(Error::MalformedResponse(format!(
                "expected exactly 1 record, got {}",
                records.len()
            )));
        }

        records
            .into_iter()
            .next()
            .ok_or_else(|| Error::MalformedResponse("empty record list".into()))
    }
}
