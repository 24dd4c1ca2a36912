use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use collager::drawing::TileDrawingConfig;
use collager::{
    debug, warehouse, Channel, Collage, CollageConfig, CollageError, DEFAULT_COLLAGE_DIMENSION,
    DEFAULT_TILE_DIMENSION,
};

#[derive(Parser)]
#[command(
    name = "collager",
    version,
    about = "Pixel-tile collage editing and a warehouse record driver"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a collage from a source image and apply per-tile operations
    Collage(CollageArgs),
    /// Read product records from INPUT and write the warehouse contents to OUTPUT
    Warehouse {
        /// Record file: a count line, then one `day id name stock demand` per line
        input: PathBuf,
        /// Destination for the warehouse report
        output: PathBuf,
    },
}

#[derive(Args)]
struct CollageArgs {
    /// Source image path
    input: PathBuf,
    /// Destination path for the rendered collage
    output: PathBuf,
    /// Edge length of one square tile, in pixels
    #[arg(long, default_value_t = DEFAULT_TILE_DIMENSION)]
    tile_dimension: u32,
    /// Number of tiles along each collage edge
    #[arg(long, default_value_t = DEFAULT_COLLAGE_DIMENSION)]
    collage_dimension: u32,
    /// Tile the scaled image across the whole grid
    #[arg(long)]
    tile: bool,
    /// Keep a single channel of a tile, as CHANNEL:COL,ROW
    #[arg(long, value_parser = parse_colorize)]
    colorize: Vec<ColorizeOp>,
    /// Replace a tile with a scaled image, as PATH:COL,ROW
    #[arg(long, value_parser = parse_replace)]
    replace: Vec<ReplaceOp>,
    /// Convert a tile to grayscale, as COL,ROW
    #[arg(long, value_parser = parse_tile_ref)]
    grayscale: Vec<TileRef>,
    /// Also save a copy with the tile grid drawn on top
    #[arg(long)]
    grid_overlay: Option<PathBuf>,
}

#[derive(Clone, Debug)]
struct TileRef {
    col: u32,
    row: u32,
}

#[derive(Clone, Debug)]
struct ColorizeOp {
    channel: Channel,
    tile: TileRef,
}

#[derive(Clone, Debug)]
struct ReplaceOp {
    path: PathBuf,
    tile: TileRef,
}

fn parse_tile_ref(s: &str) -> Result<TileRef, String> {
    let (col, row) = s
        .split_once(',')
        .ok_or_else(|| format!("expected COL,ROW, got {s:?}"))?;
    Ok(TileRef {
        col: col
            .trim()
            .parse()
            .map_err(|_| format!("invalid column {col:?}"))?,
        row: row
            .trim()
            .parse()
            .map_err(|_| format!("invalid row {row:?}"))?,
    })
}

fn parse_colorize(s: &str) -> Result<ColorizeOp, String> {
    let (channel, tile) = s
        .split_once(':')
        .ok_or_else(|| format!("expected CHANNEL:COL,ROW, got {s:?}"))?;
    Ok(ColorizeOp {
        channel: channel.parse().map_err(|e: CollageError| e.to_string())?,
        tile: parse_tile_ref(tile)?,
    })
}

fn parse_replace(s: &str) -> Result<ReplaceOp, String> {
    let (path, tile) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("expected PATH:COL,ROW, got {s:?}"))?;
    Ok(ReplaceOp {
        path: PathBuf::from(path),
        tile: parse_tile_ref(tile)?,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Command::Collage(args) => run_collage(args),
        Command::Warehouse { input, output } => warehouse::run_driver(&input, &output)
            .with_context(|| format!("Failed to process records from {}", input.display())),
    }
}

fn run_collage(args: CollageArgs) -> Result<()> {
    let config = CollageConfig::new(args.tile_dimension, args.collage_dimension);
    let mut collage = Collage::open_with_config(&args.input, config)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    if args.tile {
        collage.make_collage();
    }
    for op in &args.colorize {
        collage.colorize_tile(op.channel, op.tile.col, op.tile.row)?;
    }
    for op in &args.replace {
        collage
            .replace_tile(&op.path, op.tile.col, op.tile.row)
            .with_context(|| format!("Failed to replace tile from {}", op.path.display()))?;
    }
    for tile in &args.grayscale {
        collage.grayscale_tile(tile.col, tile.row)?;
    }

    collage
        .save(&args.output)
        .with_context(|| format!("Failed to save {}", args.output.display()))?;

    if let Some(path) = &args.grid_overlay {
        debug::save_collage_with_grid(
            collage.collage(),
            collage.layout(),
            path,
            &TileDrawingConfig::default(),
        )
        .context("Failed to save grid overlay")?;
    }
    Ok(())
}
