//! This module provides functionality for drawing tile boundaries on images.
//! It requires the `image` and `imageproc` crates.
//!
//! # Examples
//!
//! ```rust
//! use collager::{drawing::*, TileGrid};
//! use image::{Rgba, RgbaImage};
//!
//! let layout = TileGrid::new(10, 3);
//! let mut img = RgbaImage::new(30, 30);
//!
//! let config = TileDrawingConfig {
//!     row_color: Rgba([255, 0, 0, 255]),    // Red for row boundaries
//!     column_color: Rgba([0, 0, 255, 255]), // Blue for column boundaries
//!     line_thickness: 1,
//! };
//!
//! layout.draw(&mut img, &config).unwrap();
//! ```

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::{CollageError, TileGrid};

/// Configuration for drawing tile boundaries.
///
/// # Examples
///
/// ```
/// use collager::drawing::TileDrawingConfig;
///
/// let config = TileDrawingConfig::default();
/// assert_eq!(config.line_thickness, 2);
/// ```
#[derive(Debug, Clone)]
pub struct TileDrawingConfig {
    /// Color for horizontal tile boundaries (rows).
    pub row_color: Rgba<u8>,
    /// Color for vertical tile boundaries (columns).
    pub column_color: Rgba<u8>,
    /// Thickness of boundary lines, in pixels.
    pub line_thickness: u32,
}

impl Default for TileDrawingConfig {
    fn default() -> Self {
        TileDrawingConfig {
            row_color: Rgba([255, 0, 0, 255]),    // Red
            column_color: Rgba([0, 0, 255, 255]), // Blue
            line_thickness: 2,
        }
    }
}

/// Trait for types that can be drawn on an image.
pub trait Drawable {
    /// Draws the object on the provided image using the given configuration.
    ///
    /// # Errors
    /// Returns [`CollageError`] if drawing fails.
    fn draw(&self, image: &mut RgbaImage, config: &TileDrawingConfig) -> Result<(), CollageError>;
}

impl Drawable for TileGrid {
    fn draw(&self, image: &mut RgbaImage, config: &TileDrawingConfig) -> Result<(), CollageError> {
        // Horizontal boundaries under each row
        for row in self.rows() {
            let y = row.y + row.height;
            for offset in 0..config.line_thickness {
                let y = y.saturating_sub(offset) as f32;
                draw_line_segment_mut(
                    image,
                    (0.0, y),
                    (image.width() as f32, y),
                    config.row_color,
                );
            }
        }

        // Vertical boundaries after each column
        for column in self.columns() {
            let x = column.x + column.width;
            for offset in 0..config.line_thickness {
                let x = x.saturating_sub(offset) as f32;
                draw_line_segment_mut(
                    image,
                    (x, 0.0),
                    (x, image.height() as f32),
                    config.column_color,
                );
            }
        }

        Ok(())
    }
}
