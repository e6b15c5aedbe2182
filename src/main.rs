//! Head pose anchor replay tool: drives the anchor pipeline from a recorded session.

use anyhow::{Context, Result};
use clap::Parser;
use head_pose_anchor::{
    app::{AppConfig, HeadPoseAnchorApp},
    config::{Config, EXAMPLE_CONFIG},
};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded session trace (YAML)
    #[arg(short, long, required_unless_present = "dump_config")]
    trace: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Print an example configuration and exit
    #[arg(long)]
    dump_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.dump_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    info!("Head Pose Anchor - session replay");

    // Load configuration if provided
    let pipeline = match &args.config {
        Some(config_path) => {
            info!("Loading configuration from: {}", config_path.display());
            match Config::from_file(config_path) {
                Ok(cfg) => cfg,
                Err(e) => {
                    warn!("Failed to load config file: {}. Using defaults.", e);
                    Config::default()
                }
            }
        }
        None => Config::default(),
    };

    let trace_path = args.trace.context("a trace file is required")?;
    let mut app = HeadPoseAnchorApp::new(AppConfig { trace_path, pipeline })?;
    let summary = app.run()?;

    println!("poses applied:   {}", summary.stats.poses_applied);
    println!("poses rejected:  {}", summary.stats.poses_rejected);
    println!("frames skipped:  {}", summary.stats.frames_skipped);
    println!("camera rebuilds: {}", summary.stats.camera_rebuilds);
    println!("frames drawn:    {}", summary.frames_drawn);
    println!("visible:         {}", summary.visible);
    if let Some((w, h)) = summary.surface_size {
        println!("surface:         {w}x{h}");
    }
    println!("anchor world:{}", summary.anchor_world);
    if let Some(asset) = summary.asset_world {
        println!("asset world:{asset}");
    }

    Ok(())
}
