//! Mock photo API and image fixtures

use std::sync::atomic::{AtomicUsize, Ordering};

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Search path served by [`start_photo_api`]
pub const SEARCH_PATH: &str = "/v1/images/search";

/// A `width` x `height` gradient encoded as JPEG
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 64])
    });

    let mut bytes = Vec::new();
    JpegEncoder::new(&mut bytes)
        .write_image(image.as_raw(), width, height, ExtendedColorType::Rgb8)
        .expect("encode fixture JPEG");
    bytes
}

/// Hands out one new `.jpg` candidate per search, ids `cat0`, `cat1`, ...
pub struct SequentialCandidates {
    base_url: String,
    served: AtomicUsize,
}

impl Respond for SequentialCandidates {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.served.fetch_add(1, Ordering::SeqCst);
        let id = format!("cat{n}");
        ResponseTemplate::new(200).set_body_json(json!([{
            "id": id,
            "url": format!("{}/images/{id}.jpg", self.base_url),
        }]))
    }
}

/// Mock search endpoint plus image host serving `width` x `height` JPEGs
pub async fn start_photo_api(width: u32, height: u32) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(SequentialCandidates {
            base_url: server.uri(),
            served: AtomicUsize::new(0),
        })
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/images/[^/]+\.jpg$"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(jpeg_bytes(width, height)))
        .mount(&server)
        .await;

    server
}

/// Mock search endpoint that always answers with `status`
pub async fn start_failing_api(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

/// Full search URL for a mock server
pub fn search_url(server: &MockServer) -> String {
    format!("{}{SEARCH_PATH}", server.uri())
}
