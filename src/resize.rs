//! In-place thumbnail rescaling for captured screenshots.

use image::imageops::FilterType;
use image::GenericImageView;
use std::path::Path;

/// Width every screenshot is scaled to; height follows the source aspect
/// ratio.
pub const TARGET_WIDTH: u32 = 500;

/// Rescales the raster at `path` to [`TARGET_WIDTH`] and overwrites the file
/// in place. Height is `round(height * TARGET_WIDTH / width)`, clamped to at
/// least one pixel. Lanczos resampling keeps text in page thumbnails legible.
pub fn resize_to_width(path: &Path) -> Result<(), image::ImageError> {
    let img = image::open(path)?;
    let (width, height) = img.dimensions();

    let scale = f64::from(TARGET_WIDTH) / f64::from(width);
    let new_height = ((f64::from(height) * scale).round() as u32).max(1);

    let resized = img.resize_exact(TARGET_WIDTH, new_height, FilterType::Lanczos3);
    resized.save(path)?;
    Ok(())
}
