//! This crate implements a pixel-tile collage editor on top of the `image` and
//! `imageproc` crates, plus a small file-driven warehouse record loader.
//!
//! A [`Collage`] owns an original bitmap and a derived collage bitmap laid out
//! as a square grid of square tiles. The collage is produced by nearest-neighbor
//! [`scale`]-ing the original, and individual tiles can be re-tiled, colorized,
//! replaced, or converted to grayscale in place.

/// Debug module for saving a collage with its tile grid drawn on top.
///
/// # Example
/// ```no_run
/// use collager::{debug, drawing::TileDrawingConfig, Collage};
///
/// let collage = Collage::open("input.png").unwrap();
/// debug::save_collage_with_grid(
///     collage.collage(),
///     collage.layout(),
///     "overlay.png",
///     &TileDrawingConfig::default(),
/// )
/// .unwrap();
/// ```
pub mod debug;
/// This module provides functionality for drawing tile boundaries on images.
/// See [`drawing::TileDrawingConfig`] and [`drawing::Drawable`].
pub mod drawing;
/// Warehouse record parsing and the file-to-file driver.
pub mod warehouse;

use std::path::Path;
use std::str::FromStr;

use image::{Rgb, RgbImage};
use imageproc::rect::Rect;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::*;

// Collage grids are small; 8 keeps typical layouts stack-allocated.
const DEFAULT_SMALLVEC_SIZE: usize = 8;
/// Default tile edge length, in pixels.
pub const DEFAULT_TILE_DIMENSION: u32 = 150;
/// Default number of tiles along each collage edge.
pub const DEFAULT_COLLAGE_DIMENSION: u32 = 4;

#[derive(Error, Debug)]
pub enum CollageError {
    #[error("Failed to load image: {0}")]
    ImageLoad(String),

    #[error("Failed to save image: {0}")]
    ImageSave(String),

    #[error("Invalid image dimensions: width={width}, height={height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid tiling: tile_dimension={tile_dimension}, collage_dimension={collage_dimension}")]
    InvalidTiling {
        tile_dimension: u32,
        collage_dimension: u32,
    },

    #[error("Tile out of bounds: col={col}, row={row}, grid is {dimension}x{dimension} tiles")]
    TileOutOfBounds { col: u32, row: u32, dimension: u32 },

    #[error("Unknown color channel: {0:?}")]
    UnknownChannel(String),
}

/// A type alias for SmallVec with an optimized stack-allocated buffer size.
pub type SmallVecLine<T> = SmallVec<[T; DEFAULT_SMALLVEC_SIZE]>;

/// Configuration for collage construction.
///
/// # Example
/// ```
/// use collager::CollageConfig;
///
/// let config = CollageConfig::default();
/// assert_eq!(config.tile_dimension, 150);
/// assert_eq!(config.collage_dimension, 4);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CollageConfig {
    /// Edge length of one square tile, in pixels (default: 150)
    pub tile_dimension: u32,
    /// Number of tiles along each collage edge (default: 4)
    pub collage_dimension: u32,
}

impl CollageConfig {
    /// Creates a new `CollageConfig` with the specified parameters.
    ///
    /// # Example
    /// ```
    /// use collager::CollageConfig;
    ///
    /// let config = CollageConfig::new(32, 3);
    /// assert_eq!(config.tile_dimension, 32);
    /// assert_eq!(config.collage_dimension, 3);
    /// ```
    pub fn new(tile_dimension: u32, collage_dimension: u32) -> Self {
        Self {
            tile_dimension: tile_dimension.max(1), // Minimum one pixel per tile
            collage_dimension: collage_dimension.max(1),
        }
    }
}

impl Default for CollageConfig {
    fn default() -> Self {
        CollageConfig::new(DEFAULT_TILE_DIMENSION, DEFAULT_COLLAGE_DIMENSION)
    }
}

/// A color channel of an RGB pixel.
///
/// Parses case-insensitively from the channel name.
///
/// # Example
/// ```
/// use collager::Channel;
///
/// assert_eq!("RED".parse::<Channel>().unwrap(), Channel::Red);
/// assert_eq!("green".parse::<Channel>().unwrap(), Channel::Green);
/// assert!("yellow".parse::<Channel>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl FromStr for Channel {
    type Err = CollageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("red") {
            Ok(Channel::Red)
        } else if s.eq_ignore_ascii_case("green") {
            Ok(Channel::Green)
        } else if s.eq_ignore_ascii_case("blue") {
            Ok(Channel::Blue)
        } else {
            Err(CollageError::UnknownChannel(s.to_string()))
        }
    }
}

/// Represents a row of tiles in the collage layout.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Row {
    pub y: u32,
    pub height: u32,
}

/// Represents a column of tiles in the collage layout.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Column {
    pub x: u32,
    pub width: u32,
}

/// Represents one tile region, referencing a row and a column.
pub struct Cell<'a> {
    pub row: &'a Row,
    pub column: &'a Column,
}

impl From<&Cell<'_>> for Rect {
    fn from(cell: &Cell) -> Self {
        Rect::at(cell.column.x as i32, cell.row.y as i32)
            .of_size(cell.column.width, cell.row.height)
    }
}

/// The uniform grid of tile boundaries covering a collage bitmap.
///
/// # Example
/// ```
/// use collager::TileGrid;
///
/// let layout = TileGrid::new(150, 4);
/// assert_eq!(layout.rows.len(), 4);
/// assert_eq!(layout.columns.len(), 4);
/// ```
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TileGrid {
    pub rows: SmallVecLine<Row>,
    pub columns: SmallVecLine<Column>,
}

impl TileGrid {
    /// Creates the layout for a collage of `collage_dimension` x
    /// `collage_dimension` tiles, each `tile_dimension` pixels square.
    pub fn new(tile_dimension: u32, collage_dimension: u32) -> Self {
        let rows = (0..collage_dimension)
            .map(|r| Row {
                y: r * tile_dimension,
                height: tile_dimension,
            })
            .collect();
        let columns = (0..collage_dimension)
            .map(|c| Column {
                x: c * tile_dimension,
                width: tile_dimension,
            })
            .collect();
        TileGrid { rows, columns }
    }

    /// Returns an iterator over all rows in the layout.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Returns an iterator over all columns in the layout.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    /// Returns the cell at grid position (`col`, `row`), or `None` if either
    /// index is outside the layout. Cell (0, 0) is the upper leftmost tile.
    ///
    /// # Example
    /// ```
    /// use collager::TileGrid;
    /// use imageproc::rect::Rect;
    ///
    /// let layout = TileGrid::new(10, 3);
    /// let cell = layout.cell(2, 1).unwrap();
    /// let rect = Rect::from(&cell);
    /// assert_eq!(rect.left(), 20);
    /// assert_eq!(rect.top(), 10);
    /// assert!(layout.cell(3, 0).is_none());
    /// ```
    pub fn cell(&self, col: u32, row: u32) -> Option<Cell<'_>> {
        let row = self.rows.get(row as usize)?;
        let column = self.columns.get(col as usize)?;
        Some(Cell { row, column })
    }

    /// Returns an iterator over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell<'_>> {
        self.rows
            .iter()
            .flat_map(move |row| self.columns.iter().map(move |column| Cell { row, column }))
    }
}

/// Scales `source` into `target` using nearest-neighbor sampling on both axes
/// independently: destination pixel (i, j) samples source pixel
/// `(i * source_width / target_width, j * source_height / target_height)` with
/// integer (floor) division. `source` is not mutated; every pixel of `target`
/// is overwritten. No interpolation is performed, so aliasing artifacts are
/// expected on large ratio changes.
///
/// When target dimensions equal source dimensions the mapping is the identity.
/// If either image has a zero dimension the call is a no-op.
///
/// # Example
/// ```
/// use collager::scale;
/// use image::{Rgb, RgbImage};
///
/// let source = RgbImage::from_fn(4, 4, |x, y| Rgb([x as u8, y as u8, 0]));
/// let mut target = RgbImage::new(4, 4);
/// scale(&source, &mut target);
/// assert_eq!(source, target);
/// ```
pub fn scale(source: &RgbImage, target: &mut RgbImage) {
    let (source_width, source_height) = source.dimensions();
    let (target_width, target_height) = target.dimensions();
    if source_width == 0 || source_height == 0 || target_width == 0 || target_height == 0 {
        return;
    }

    trace!(
        "Scaling {}x{} into {}x{}",
        source_width,
        source_height,
        target_width,
        target_height
    );
    for i in 0..target_width {
        let src_col = (i as u64 * source_width as u64 / target_width as u64) as u32;
        for j in 0..target_height {
            let src_row = (j as u64 * source_height as u64 / target_height as u64) as u32;
            target.put_pixel(i, j, *source.get_pixel(src_col, src_row));
        }
    }
}

/// Returns the monochrome luminance of `color` as an intensity between 0.0 and
/// 255.0 using the NTSC formula `Y = 0.299 R + 0.587 G + 0.114 B`. For a shade
/// of gray (R = G = B) the exact integer value is returned, with no
/// floating-point roundoff.
pub fn luminance(color: &Rgb<u8>) -> f64 {
    let [r, g, b] = color.0;
    if r == g && r == b {
        return r as f64;
    }
    0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64
}

/// Returns the grayscale version of `color`, with all three channels set to
/// the rounded NTSC luminance.
///
/// # Example
/// ```
/// use collager::to_gray;
/// use image::Rgb;
///
/// assert_eq!(to_gray(&Rgb([255, 0, 0])), Rgb([76, 76, 76]));
/// assert_eq!(to_gray(&Rgb([42, 42, 42])), Rgb([42, 42, 42]));
/// ```
pub fn to_gray(color: &Rgb<u8>) -> Rgb<u8> {
    let y = luminance(color).round() as u8;
    Rgb([y, y, y])
}

/// A pixel-tile collage editor.
///
/// Owns an original bitmap (immutable after load) and a derived collage bitmap
/// of `tile_dimension * collage_dimension` pixels in each axis. The collage
/// bitmap's edge is always an exact integer multiple of the tile edge and is
/// never resized after construction.
///
/// # Example
/// ```
/// use collager::{Collage, CollageConfig};
/// use image::{Rgb, RgbImage};
///
/// let source = RgbImage::from_pixel(10, 10, Rgb([1, 2, 3]));
/// let collage = Collage::from_image(source, CollageConfig::new(5, 2)).unwrap();
/// assert_eq!(collage.collage().width(), 10);
/// assert_eq!(collage.collage().height(), 10);
/// ```
#[derive(Debug)]
pub struct Collage {
    original: RgbImage,
    collage: RgbImage,
    tile_dimension: u32,
    collage_dimension: u32,
    layout: TileGrid,
}

impl Collage {
    /// Opens the image at `path` and builds a collage with the default
    /// tiling (150-pixel tiles, 4x4 grid). The collage bitmap starts as the
    /// source scaled to the full collage size.
    ///
    /// # Example
    /// ```no_run
    /// use collager::Collage;
    ///
    /// let collage = Collage::open("input.png").unwrap();
    /// assert_eq!(collage.tile_dimension(), 150);
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CollageError> {
        Self::open_with_config(path, CollageConfig::default())
    }

    /// Opens the image at `path` and builds a collage with custom tiling.
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: CollageConfig,
    ) -> Result<Self, CollageError> {
        let original = load_rgb(path.as_ref())?;
        Self::from_image(original, config)
    }

    /// Builds a collage from an already-loaded bitmap.
    ///
    /// Allocates a black collage bitmap of
    /// `tile_dimension * collage_dimension` pixels square and immediately
    /// scales `original` into it.
    pub fn from_image(original: RgbImage, config: CollageConfig) -> Result<Self, CollageError> {
        trace!("Building collage with config: {:?}", config);
        let (width, height) = original.dimensions();
        if width == 0 || height == 0 {
            error!(
                "Invalid source dimensions: width={}, height={}",
                width, height
            );
            return Err(CollageError::InvalidDimensions { width, height });
        }
        if config.tile_dimension == 0 || config.collage_dimension == 0 {
            return Err(CollageError::InvalidTiling {
                tile_dimension: config.tile_dimension,
                collage_dimension: config.collage_dimension,
            });
        }

        let edge = config.tile_dimension * config.collage_dimension;
        let mut collage = RgbImage::new(edge, edge);
        scale(&original, &mut collage);

        Ok(Collage {
            original,
            collage,
            tile_dimension: config.tile_dimension,
            collage_dimension: config.collage_dimension,
            layout: TileGrid::new(config.tile_dimension, config.collage_dimension),
        })
    }

    /// Returns the tile edge length in pixels.
    pub fn tile_dimension(&self) -> u32 {
        self.tile_dimension
    }

    /// Returns the number of tiles along each collage edge.
    pub fn collage_dimension(&self) -> u32 {
        self.collage_dimension
    }

    /// Returns the original bitmap.
    pub fn original(&self) -> &RgbImage {
        &self.original
    }

    /// Returns the collage bitmap.
    pub fn collage(&self) -> &RgbImage {
        &self.collage
    }

    /// Returns the tile layout of the collage bitmap.
    pub fn layout(&self) -> &TileGrid {
        &self.layout
    }

    /// Fills the collage bitmap with tiled copies of the original.
    ///
    /// One tile is produced by scaling the original down to
    /// `tile_dimension` pixels square; the collage is then filled by copying
    /// from that tile with wraparound indexing, so collage pixel (i, j) holds
    /// tile pixel (i mod tile_dimension, j mod tile_dimension).
    pub fn make_collage(&mut self) {
        trace!(
            "Tiling collage: {} tiles of {} pixels",
            self.collage_dimension,
            self.tile_dimension
        );
        let mut tile = RgbImage::new(self.tile_dimension, self.tile_dimension);
        scale(&self.original, &mut tile);

        let td = self.tile_dimension;
        for i in 0..self.collage.width() {
            for j in 0..self.collage.height() {
                self.collage.put_pixel(i, j, *tile.get_pixel(i % td, j % td));
            }
        }
    }

    /// Colorizes the tile at (`col`, `row`): every pixel keeps only the
    /// selected channel's intensity, the other two channels are zeroed.
    ///
    /// # Example
    /// ```
    /// use collager::{Channel, Collage, CollageConfig};
    /// use image::{Rgb, RgbImage};
    ///
    /// let source = RgbImage::from_pixel(8, 8, Rgb([10, 20, 30]));
    /// let mut collage = Collage::from_image(source, CollageConfig::new(4, 2)).unwrap();
    /// collage.colorize_tile(Channel::Green, 0, 0).unwrap();
    /// assert_eq!(*collage.collage().get_pixel(0, 0), Rgb([0, 20, 0]));
    /// assert_eq!(*collage.collage().get_pixel(4, 0), Rgb([10, 20, 30]));
    /// ```
    pub fn colorize_tile(
        &mut self,
        channel: Channel,
        col: u32,
        row: u32,
    ) -> Result<(), CollageError> {
        trace!("Colorizing tile ({}, {}) keeping {:?}", col, row, channel);
        let rect = self.tile_rect(col, row)?;
        for (x, y) in rect_pixels(&rect) {
            let Rgb([r, g, b]) = *self.collage.get_pixel(x, y);
            let filtered = match channel {
                Channel::Red => Rgb([r, 0, 0]),
                Channel::Green => Rgb([0, g, 0]),
                Channel::Blue => Rgb([0, 0, b]),
            };
            self.collage.put_pixel(x, y, filtered);
        }
        Ok(())
    }

    /// Replaces the tile at (`col`, `row`) with the image loaded from `path`,
    /// scaled to exactly tile dimensions. Tile (0, 0) is the upper leftmost
    /// tile; pixels outside the addressed tile are untouched.
    pub fn replace_tile<P: AsRef<Path>>(
        &mut self,
        path: P,
        col: u32,
        row: u32,
    ) -> Result<(), CollageError> {
        let replacement = load_rgb(path.as_ref())?;
        self.replace_tile_with_image(&replacement, col, row)
    }

    /// Replaces the tile at (`col`, `row`) with an already-loaded bitmap,
    /// scaled to exactly tile dimensions.
    pub fn replace_tile_with_image(
        &mut self,
        replacement: &RgbImage,
        col: u32,
        row: u32,
    ) -> Result<(), CollageError> {
        debug!("Replacing tile ({}, {})", col, row);
        let rect = self.tile_rect(col, row)?;
        let mut scaled = RgbImage::new(self.tile_dimension, self.tile_dimension);
        scale(replacement, &mut scaled);

        for (x, y) in rect_pixels(&rect) {
            let tile_x = x - rect.left() as u32;
            let tile_y = y - rect.top() as u32;
            self.collage
                .put_pixel(x, y, *scaled.get_pixel(tile_x, tile_y));
        }
        Ok(())
    }

    /// Converts the tile at (`col`, `row`) to grayscale using the NTSC
    /// luminance weights. Applying it twice leaves the tile unchanged.
    pub fn grayscale_tile(&mut self, col: u32, row: u32) -> Result<(), CollageError> {
        trace!("Grayscaling tile ({}, {})", col, row);
        let rect = self.tile_rect(col, row)?;
        for (x, y) in rect_pixels(&rect) {
            let gray = to_gray(self.collage.get_pixel(x, y));
            self.collage.put_pixel(x, y, gray);
        }
        Ok(())
    }

    /// Writes the collage bitmap to `path`; the format is chosen from the
    /// file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CollageError> {
        self.collage
            .save(path)
            .map_err(|e| CollageError::ImageSave(e.to_string()))
    }

    /// Resolves a tile grid position into its pixel rectangle.
    fn tile_rect(&self, col: u32, row: u32) -> Result<Rect, CollageError> {
        self.layout
            .cell(col, row)
            .map(|cell| Rect::from(&cell))
            .ok_or_else(|| {
                error!("Tile ({}, {}) out of bounds", col, row);
                CollageError::TileOutOfBounds {
                    col,
                    row,
                    dimension: self.collage_dimension,
                }
            })
    }
}

impl TryFrom<RgbImage> for Collage {
    type Error = CollageError;

    fn try_from(image: RgbImage) -> Result<Self, Self::Error> {
        Collage::from_image(image, CollageConfig::default())
    }
}

/// Loads the image at `path` as an RGB bitmap.
fn load_rgb(path: &Path) -> Result<RgbImage, CollageError> {
    image::open(path)
        .map(|img| img.to_rgb8())
        .map_err(|e| CollageError::ImageLoad(format!("{}: {}", path.display(), e)))
}

/// Iterates over the absolute pixel coordinates covered by `rect`, column by
/// column.
fn rect_pixels(rect: &Rect) -> impl Iterator<Item = (u32, u32)> {
    let left = rect.left() as u32;
    let top = rect.top() as u32;
    let (width, height) = (rect.width(), rect.height());
    (0..width).flat_map(move |i| (0..height).map(move |j| (left + i, top + j)))
}
