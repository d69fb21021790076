//! nineslice - nine-slice sprite tooling
//!
//! Command-line front end for the nineslice crates:
//! - Border detection, alpha trimming and center trim/collapse/extend of bitmaps
//! - Mesh generation from a nineslice.toml job, as statistics or JSON
//! - Preview rendering of generated meshes

mod commands;
mod config;
mod init;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use nineslice_image::Border;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::JobConfig;

/// Nine-slice border detection, bitmap trimming and mesh generation
#[derive(Parser, Debug)]
#[command(name = "nineslice")]
#[command(about = "Nine-slice border detection, bitmap trimming and mesh generation")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Infer the nine-slice border of an image
    Detect {
        input: PathBuf,

        /// Color difference tolerance, 0 treats any change as an edge
        #[arg(short, long, default_value = "1.0")]
        tolerance: f32,
    },

    /// Crop fully transparent margins
    TrimAlpha {
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// Border as "left,bottom,right,top" or a single inset
        #[arg(short, long, value_parser = parse_border, default_value = "0")]
        border: Border,
    },

    /// Remove one stretchable row and column
    TrimCenter {
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long, value_parser = parse_border)]
        border: Border,
    },

    /// Reduce the stretchable region to a single row and column
    CollapseCenter {
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long, value_parser = parse_border)]
        border: Border,
    },

    /// Detect the border, trim alpha and collapse the center
    Process {
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long, default_value = "1.0")]
        tolerance: f32,
    },

    /// Grow an image by repeating its stretchable row and column
    Extend {
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(short, long, value_parser = parse_border)]
        border: Border,

        /// Target size as WxH (e.g. 64x32)
        #[arg(short, long, value_parser = parse_size)]
        size: Size,
    },

    /// Generate the mesh of a job and print its statistics
    Mesh {
        /// Job file or directory containing nineslice.toml
        #[arg(default_value = ".")]
        job: PathBuf,

        /// Write the mesh as JSON (defaults to the job's output.mesh)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the mesh as JSON instead of statistics
        #[arg(long)]
        json: bool,
    },

    /// Render a preview image of a job's mesh
    Render {
        #[arg(default_value = ".")]
        job: PathBuf,

        /// Preview image (defaults to the job's output.preview)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output pixels per target unit
        #[arg(long, default_value = "1.0")]
        scale: f32,
    },

    /// Create a starter nineslice.toml
    Init {
        /// Source image, relative to the job directory
        image: PathBuf,

        #[arg(long, default_value = ".")]
        dir: PathBuf,

        /// Overwrite an existing job file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Size {
    width: u32,
    height: u32,
}

/// Parse "left,bottom,right,top" or a single uniform inset
fn parse_border(s: &str) -> std::result::Result<Border, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<u32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid border '{s}': {e}"))?;
    match values.as_slice() {
        [inset] => Ok(Border::uniform(*inset)),
        [left, bottom, right, top] => Ok(Border::new(*left, *bottom, *right, *top)),
        _ => Err(format!(
            "invalid border '{s}': expected 1 or 4 comma-separated values"
        )),
    }
}

/// Parse a "WxH" size
fn parse_size(s: &str) -> std::result::Result<Size, String> {
    let (width, height) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid size '{s}': expected WxH"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid size '{s}': {e}"))
    };
    Ok(Size {
        width: parse(width)?,
        height: parse(height)?,
    })
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Detect { input, tolerance } => {
            let border = commands::detect(&input, tolerance)?;
            println!("{border}");
        }
        Commands::TrimAlpha {
            input,
            output,
            border,
        } => {
            let border = commands::trim_alpha(&input, &output, border)?;
            tracing::info!("Wrote {}", output.display());
            println!("{border}");
        }
        Commands::TrimCenter {
            input,
            output,
            border,
        } => {
            let (width, height) = commands::trim_center(&input, &output, border)?;
            tracing::info!("Wrote {} ({}x{})", output.display(), width, height);
        }
        Commands::CollapseCenter {
            input,
            output,
            border,
        } => {
            let (width, height) = commands::collapse_center(&input, &output, border)?;
            tracing::info!("Wrote {} ({}x{})", output.display(), width, height);
        }
        Commands::Process {
            input,
            output,
            tolerance,
        } => {
            let (border, width, height) = commands::process(&input, &output, tolerance)?;
            tracing::info!("Wrote {} ({}x{})", output.display(), width, height);
            println!("{border}");
        }
        Commands::Extend {
            input,
            output,
            border,
            size,
        } => {
            commands::extend(&input, &output, border, size.width, size.height)?;
            tracing::info!("Wrote {} ({}x{})", output.display(), size.width, size.height);
        }
        Commands::Mesh { job, output, json } => {
            let job = JobConfig::load_from_dir(&job)?;
            let built = commands::build_job_mesh(&job)?;
            let mesh = &built.mesh;

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(mesh).context("Failed to serialize mesh")?
                );
            } else {
                println!("border: {}", built.sprite.border);
                println!("vertices: {}", mesh.vertex_count());
                println!("triangles: {}", mesh.triangle_count());
                println!("area: {:.3}", mesh.area());
            }

            if let Some(path) = output.or_else(|| job.output.mesh.as_deref().map(|p| job.resolve(p))) {
                commands::write_mesh_json(mesh, &path)?;
                tracing::info!("Wrote {}", path.display());
            }
        }
        Commands::Render { job, output, scale } => {
            let job = JobConfig::load_from_dir(&job)?;
            let path = output
                .or_else(|| job.output.preview.as_deref().map(|p| job.resolve(p)))
                .context("No preview path given and the job has no output.preview")?;
            let (width, height) = commands::render(&job, &path, scale)?;
            tracing::info!("Wrote {} ({}x{})", path.display(), width, height);
        }
        Commands::Init { image, dir, force } => {
            let path = init::create_job(&dir, &image, force)?;
            tracing::info!("Created {}", path.display());
        }
    }

    Ok(())
}
