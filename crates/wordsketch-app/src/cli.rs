//! Command line interface for rendering saved stroke lists.

use crate::config::{AppConfig, ConfigError};
use crate::surface::{DrawingSurface, ExportError};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use wordsketch_core::{BrushError, Drawing, PointerEvent, RawPointer, Stroke, SurfaceGeometry};

/// CLI errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse strokes in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Brush(#[from] BrushError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Render and inspect WordSketch drawings
#[derive(Parser, Debug)]
#[command(name = "wordsketch")]
#[command(version, about)]
pub struct Cli {
    /// JSON config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a stroke list and write it as PNG
    Render {
        /// Stroke list JSON file
        input: PathBuf,
        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,
        /// Canvas width in pixels
        #[arg(long)]
        width: Option<u32>,
        /// Canvas height in pixels
        #[arg(long)]
        height: Option<u32>,
    },
    /// Print stroke and point counts
    Info {
        /// Stroke list JSON file
        input: PathBuf,
    },
}

/// Run a parsed command, writing human-readable output to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Command::Render {
            input,
            output,
            width,
            height,
        } => {
            config.width = width.unwrap_or(config.width);
            config.height = height.unwrap_or(config.height);
            config.validate()?;

            let drawing = read_drawing(&input)?;
            let png = render_drawing(&drawing, &config)?;
            std::fs::write(&output, &png).map_err(|source| CliError::Write {
                path: output.clone(),
                source,
            })?;
            log::info!("Wrote {}", output.display());
            writeln!(
                out,
                "Rendered {} strokes to {} ({}x{})",
                drawing.len(),
                output.display(),
                config.width,
                config.height
            )
            .map_err(|source| CliError::Write {
                path: PathBuf::from("<stdout>"),
                source,
            })?;
        }
        Command::Info { input } => {
            let drawing = read_drawing(&input)?;
            writeln!(out, "{}", describe(&drawing)).map_err(|source| CliError::Write {
                path: PathBuf::from("<stdout>"),
                source,
            })?;
        }
    }
    Ok(())
}

/// Load a stroke list, dropping invalid strokes.
pub fn read_drawing(path: &Path) -> Result<Drawing, CliError> {
    let json = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Drawing::from_json(&json).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Replay strokes through a fresh surface as pointer events and export PNG bytes.
pub fn render_drawing(drawing: &Drawing, config: &AppConfig) -> Result<Vec<u8>, CliError> {
    let mut surface = DrawingSurface::from_config(config)?;
    surface.mount(SurfaceGeometry::unscaled(config.width, config.height));

    for stroke in drawing.strokes() {
        replay_stroke(&mut surface, stroke)?;
    }
    Ok(surface.export_raster()?)
}

fn replay_stroke(surface: &mut DrawingSurface, stroke: &Stroke) -> Result<(), BrushError> {
    surface.set_brush_color(&stroke.color)?;
    surface.set_brush_size(stroke.size)?;

    let mut points = stroke.points.iter();
    if let Some(first) = points.next() {
        surface.handle_event(&PointerEvent::MouseDown(RawPointer::mouse(first.x, first.y)));
        for point in points {
            let raw = RawPointer::mouse(point.x, point.y);
            surface.handle_event(&PointerEvent::MouseMove(raw));
        }
        surface.handle_event(&PointerEvent::MouseUp);
    }
    Ok(())
}

/// One-line summary of a drawing.
pub fn describe(drawing: &Drawing) -> String {
    let mut summary = format!("{} strokes, {} points", drawing.len(), drawing.point_count());
    if let Some(bounds) = drawing.bounds() {
        summary.push_str(&format!(
            ", bounds ({:.1}, {:.1}) - ({:.1}, {:.1})",
            bounds.x0, bounds.y0, bounds.x1, bounds.y1
        ));
    }
    summary
}
