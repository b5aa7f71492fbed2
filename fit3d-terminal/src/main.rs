//! fit3d terminal demo
//!
//! Frames a mesh (an STL file, or a cube when none is given) next to a
//! spinning cube, using the camera fit calculator to choose the view.
//! Controls:
//!   - WASD / Arrow Keys: Rotate the primary mesh
//!   - E/R: Roll rotation
//!   - F: Re-frame the scene
//!   - Q/ESC: Quit

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use fit3d_core::{Mesh, MeshLoader, ViewAxis};
use fit3d_terminal::{AppConfig, Scene, TerminalApp};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fit3d-terminal", about = "Frame and render a 3D scene in the terminal")]
struct Cli {
    /// STL file to show as the primary mesh
    stl: Option<PathBuf>,

    /// Vertical field of view in degrees, between 0 and 180 exclusive
    #[arg(long, default_value_t = 45.0)]
    fov: f32,

    /// Target frames per second
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Minimum distance between the camera and the scene center
    #[arg(long, default_value_t = 0.5)]
    min_distance: f32,

    /// Axis the camera is placed along, looking back at the scene
    #[arg(long, value_enum, default_value_t = Axis::PosZ)]
    axis: Axis,

    /// Give up on the STL load after this many milliseconds
    #[arg(long)]
    load_timeout_ms: Option<u64>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Axis {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl From<Axis> for ViewAxis {
    fn from(axis: Axis) -> Self {
        match axis {
            Axis::PosX => ViewAxis::PosX,
            Axis::NegX => ViewAxis::NegX,
            Axis::PosY => ViewAxis::PosY,
            Axis::NegY => ViewAxis::NegY,
            Axis::PosZ => ViewAxis::PosZ,
            Axis::NegZ => ViewAxis::NegZ,
        }
    }
}

impl Cli {
    fn config(&self) -> AppConfig {
        AppConfig {
            fov_degrees: self.fov,
            fps: self.fps,
            min_distance: self.min_distance,
            view_axis: self.axis.into(),
            load_timeout: self.load_timeout_ms.map(Duration::from_millis),
            ..AppConfig::default()
        }
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let default = if cli.verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match &cli.log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = cli.config();
    config.validate().context("invalid configuration")?;

    // The cube stands in for the primary mesh until the STL arrives
    let scene = Scene::new(Mesh::cube(2.0), config.spin);
    let mut app = TerminalApp::new(scene, config).context("failed to start terminal app")?;
    if let Some(path) = &cli.stl {
        app = app.with_pending_load(MeshLoader::spawn(path));
    }

    app.run().context("terminal app failed")?;
    Ok(())
}
