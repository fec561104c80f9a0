//! Tests for batch orchestration.


use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use crate::config::Config;
use crate::test_support::jpeg_bytes;

use super::PhotoDownloader;

pub(super) const SEARCH_PATH: &str = "/v1/images/search";

/// Answers every search with a fresh candidate id and a URL on the same server
pub(super) struct SequentialCandidates {
    base_url: String,
    extension: &'static str,
    served: AtomicUsize,
}

impl SequentialCandidates {
    pub(super) fn new(server: &MockServer, extension: &'static str) -> Self {
        Self {
            base_url: server.uri(),
            extension,
            served: AtomicUsize::new(0),
        }
    }
}

impl Respond for SequentialCandidates {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.served.fetch_add(1, Ordering::SeqCst);
        let id = format!("cat{n}");
        ResponseTemplate::new(200).set_body_json(json!([{
            "id": id,
            "url": format!("{}/images/{id}.{}", self.base_url, self.extension),
            "width": 200,
            "height": 200
        }]))
    }
}

pub(super) fn downloader_for(server: &MockServer, max_concurrent_tasks: Option<usize>) -> PhotoDownloader {
    let config = Config {
        search_url: format!("{}{SEARCH_PATH}", server.uri()),
        max_concurrent_tasks,
        ..Config::default()
    };
    PhotoDownloader::new(config).unwrap()
}

pub(super) async fn mount_search(server: &MockServer, responder: impl Respond + 'static) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(responder)
        .mount(server)
        .await;
}

pub(super) async fn mount_images(server: &MockServer, width: u32, height: u32) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/images/[^/]+$"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "image/jpeg")
                .set_body_bytes(jpeg_bytes(width, height)),
        )
        .mount(server)
        .await;
}

#[test]
fn new_rejects_invalid_config() {
    for permits in [0, usize::MAX] {
        let config = Config {
            max_concurrent_tasks: Some(permits),
            ..Config::default()
        };
        assert!(
            matches!(PhotoDownloader::new(config), Err(crate::Error::Config { .. })),
            "{permits}"
        );
    }
}
