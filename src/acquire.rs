//! Image download and decode

use image::{DynamicImage, ImageFormat};

use crate::error::{Error, Result};
use crate::fetcher::recognized_image_format;

/// Download the photo at `url` and decode it
///
/// The codec is chosen from the URL extension. Network failures and non-2xx
/// statuses are [`Error::FetchImage`]; bytes the codec rejects are
/// [`Error::Decode`]. Nothing is retried here.
pub async fn acquire_image(client: &reqwest::Client, url: &str) -> Result<DynamicImage> {
    let format = recognized_image_format(url).ok_or_else(|| Error::Decode {
        url: url.to_string(),
        reason: "unrecognized image extension".to_string(),
    })?;

    let response = client.get(url).send().await.map_err(|e| Error::FetchImage {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::FetchImage {
            url: url.to_string(),
            reason: format!("HTTP status {}", status.as_u16()),
        });
    }

    let bytes = response.bytes().await.map_err(|e| Error::FetchImage {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    tracing::debug!(url, size_bytes = bytes.len(), "image downloaded");

    decode_image(bytes, format, url).await
}

/// Decode `bytes` on the blocking pool
async fn decode_image<B>(bytes: B, format: ImageFormat, url: &str) -> Result<DynamicImage>
where
    B: AsRef<[u8]> + Send + 'static,
{
    tokio::task::spawn_blocking(move || image::load_from_memory_with_format(bytes.as_ref(), format))
        .await
        .map_err(|e| Error::TaskPanicked(format!("image decoder: {e}")))?
        .map_err(|e| Error::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
}
