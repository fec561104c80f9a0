//! Centered crop

use image::DynamicImage;

use crate::error::{Error, Result};

/// Top-left corner of a `width` x `height` rectangle centered in the source
///
/// Returns `None` when the rectangle is empty or does not fit. With odd slack
/// the extra pixel stays on the right / bottom.
pub fn centered_origin(
    source_width: u32,
    source_height: u32,
    width: u32,
    height: u32,
) -> Option<(u32, u32)> {
    if width == 0 || height == 0 || width > source_width || height > source_height {
        return None;
    }
    Some(((source_width - width) / 2, (source_height - height) / 2))
}

/// Cut exactly `width` x `height` pixels out of the middle of `image`
///
/// Never clamps or upscales: a rectangle that does not fit is
/// [`Error::InvalidCropGeometry`].
pub fn crop_centered(image: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage> {
    let (source_width, source_height) = (image.width(), image.height());

    let (x, y) = centered_origin(source_width, source_height, width, height).ok_or(
        Error::InvalidCropGeometry {
            requested_width: width,
            requested_height: height,
            source_width,
            source_height,
        },
    )?;

    Ok(image.crop_imm(x, y, width, height))
}
