use std::path::Path;

use image::{DynamicImage, RgbImage};

use crate::drawing::{Drawable, TileDrawingConfig};
use crate::{CollageError, TileGrid};

/// Saves the image with the tile grid drawn on it.
///
/// Draws the layout's tile boundaries on a copy of `image` and saves the
/// result to `output_path`.
///
/// # Errors
/// Returns [`CollageError`] if drawing or saving fails.
///
/// # Examples
///
/// ```no_run
/// use collager::{debug, drawing::TileDrawingConfig, Collage};
///
/// let collage = Collage::open("input.png").unwrap();
/// let config = TileDrawingConfig::default();
/// debug::save_collage_with_grid(collage.collage(), collage.layout(), "overlay.png", &config)
///     .unwrap();
/// ```
pub fn save_collage_with_grid<P: AsRef<Path>>(
    image: &RgbImage,
    layout: &TileGrid,
    output_path: P,
    config: &TileDrawingConfig,
) -> Result<(), CollageError> {
    let mut rgba_img = DynamicImage::ImageRgb8(image.clone()).to_rgba8();
    layout.draw(&mut rgba_img, config)?;
    rgba_img
        .save(output_path)
        .map_err(|e| CollageError::ImageSave(e.to_string()))
}
