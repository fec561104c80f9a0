//! Writing cropped photos to disk

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbImage};

use crate::error::{Error, Result};

/// Where the photo for candidate `id` goes inside `destination`
pub fn output_path(destination: &Path, id: &str) -> PathBuf {
    destination.join(format!("cat-{id}.jpg"))
}

/// Save `image` as `<destination>/cat-<id>.jpg`
///
/// Creates `destination` (and parents) if needed; an existing directory is
/// fine. An existing file for the same id is overwritten. Encoding runs on
/// the blocking pool and the file handle is closed on every path.
pub async fn persist(image: &DynamicImage, destination: &Path, id: &str) -> Result<PathBuf> {
    let path = output_path(destination, id);

    if id.is_empty() || id.contains(['/', '\\', '\0']) || id.contains("..") {
        return Err(Error::Persist {
            path,
            reason: format!("candidate id {id:?} is not a valid file name component"),
        });
    }

    tokio::fs::create_dir_all(destination)
        .await
        .map_err(|e| Error::Persist {
            path: destination.to_path_buf(),
            reason: format!("failed to create directory: {e}"),
        })?;

    // JPEG has no alpha channel
    let rgb = image.to_rgb8();
    let target = path.clone();
    tokio::task::spawn_blocking(move || write_jpeg(&rgb, &target))
        .await
        .map_err(|e| Error::TaskPanicked(format!("JPEG writer: {e}")))??;

    tracing::debug!(path = %path.display(), "photo written");
    Ok(path)
}

fn write_jpeg(image: &RgbImage, path: &Path) -> Result<()> {
    let persist_error = |reason: String| Error::Persist {
        path: path.to_path_buf(),
        reason,
    };

    let file = std::fs::File::create(path)
        .map_err(|e| persist_error(format!("failed to create file: {e}")))?;
    let mut writer = BufWriter::new(file);

    JpegEncoder::new(&mut writer)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| persist_error(format!("failed to encode JPEG: {e}")))?;

    writer
        .flush()
        .map_err(|e| persist_error(format!("failed to flush file: {e}")))
}
