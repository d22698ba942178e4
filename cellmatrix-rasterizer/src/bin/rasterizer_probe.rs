//! Renders a sample string through the tile cache and prints the
//! composed pixels as ASCII luminance, plus cache statistics. Useful
//! for checking font selection and cell metrics without a display.

use std::{path::PathBuf, process::ExitCode};

use cellmatrix_core::{
    Cell, Color, GlyphStyle, Rasterize, Surface, TileCache,
};
use cellmatrix_rasterizer::{FillRasterizer, FontRasterizer, RasterConfig};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rasterizer-probe", version, about)]
struct Cli {
    /// Sample text to rasterize.
    #[arg(default_value = "The quick brown fox 0O1lI")]
    text: String,

    /// Font family; overrides TERMINAL_FONT.
    #[arg(long)]
    font: Option<String>,

    /// Font size in pixels.
    #[arg(long)]
    size: Option<f32>,

    /// JSON raster configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the deterministic block rasterizer instead of a font.
    #[arg(long)]
    blocks: bool,
}

const LUMINANCE_RAMP: &[u8] = b" .:-=+*#%@";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(error) => {
                eprintln!("rasterizer-probe: {error}");
                return ExitCode::FAILURE;
            },
        },
        None => RasterConfig::from_env(),
    };
    if let Some(font) = cli.font {
        config.font_family = Some(font);
    }
    if let Some(size) = cli.size {
        config.font_size = size;
    }

    let mut rasterizer: Box<dyn Rasterize> = if cli.blocks {
        Box::new(FillRasterizer)
    } else {
        match FontRasterizer::new(&config) {
            Ok(font) => Box::new(font),
            Err(error) => {
                eprintln!("rasterizer-probe: {error}; falling back to blocks");
                Box::new(FillRasterizer)
            },
        }
    };

    let inscription = config.inscription();
    let cell_width = inscription.cell_width as u32;
    let cell_height = inscription.cell_height as u32;

    let mut cache = match TileCache::new(8, cell_width, cell_height) {
        Ok(cache) => cache,
        Err(error) => {
            eprintln!("rasterizer-probe: {error}");
            return ExitCode::FAILURE;
        },
    };

    let columns: Vec<char> = cli.text.chars().collect();
    let mut composed =
        match Surface::new(columns.len() as u32 * cell_width, cell_height) {
            Ok(surface) => surface,
            Err(error) => {
                eprintln!("rasterizer-probe: {error}");
                return ExitCode::FAILURE;
            },
        };

    let style = GlyphStyle {
        glyph_color: Color::WHITE,
        ..Default::default()
    };
    let mut scratch = [0u8; 4];
    for (column, &c) in columns.iter().enumerate() {
        let cell = Cell::glyph(c as i32, Color::BLACK, style);
        let text: &str = c.encode_utf8(&mut scratch);

        match cache.acquire(&cell, text, rasterizer.as_mut()) {
            Ok(address) => {
                if let Some(tile) = cache.image(address.image) {
                    composed.blit_from(
                        tile,
                        address.x_pixels,
                        address.y_pixels,
                        column as u32 * cell_width,
                        0,
                        cell_width,
                        cell_height,
                    );
                }
            },
            Err(error) => {
                eprintln!("rasterizer-probe: {error}");
                return ExitCode::FAILURE;
            },
        }
    }

    print_ascii(&composed);
    println!(
        "cells {} distinct-tiles {} rasterizations {} tile {}x{}",
        columns.len(),
        cache.len(),
        cache.rasterization_count(),
        cell_width,
        cell_height,
    );

    ExitCode::SUCCESS
}

fn load_config(path: &PathBuf) -> Result<RasterConfig, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|error| format!("{}: {error}", path.display()))?;
    serde_json::from_str(&raw).map_err(|error| format!("{}: {error}", path.display()))
}

fn print_ascii(surface: &Surface) {
    for y in 0..surface.height() {
        let mut row = String::with_capacity(surface.width() as usize);
        for x in 0..surface.width() {
            let luminance = surface
                .pixel(x, y)
                .map(|c| (c.r as u32 * 30 + c.g as u32 * 59 + c.b as u32 * 11) / 100)
                .unwrap_or(0);
            let index = (luminance as usize * (LUMINANCE_RAMP.len() - 1)) / 255;
            row.push(LUMINANCE_RAMP[index] as char);
        }
        println!("{row}");
    }
}
