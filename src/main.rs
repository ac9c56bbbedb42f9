use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::{debug, error};

use mandelbulb_fields::{sequence, RenderConfig};

/// Render Mandelbulb distance and light fields to text files.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// TOML render configuration. Missing fields use the reference scene.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory. Its contents are deleted before rendering.
    #[arg(long, default_value = "data")]
    output: PathBuf,

    /// Number of frames to render.
    #[arg(long)]
    frames: Option<u32>,

    /// Side length of the square output grids.
    #[arg(long)]
    resolution: Option<u32>,

    /// Also write distance, light and combined PNG previews per frame.
    #[arg(long)]
    png: bool,

    /// Worker threads (defaults to one per CPU).
    #[arg(long)]
    threads: Option<usize>,
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => RenderConfig::default(),
    };
    if let Some(frames) = args.frames {
        config.frames = frames;
    }
    if let Some(resolution) = args.resolution {
        config.resolution = resolution;
    }
    if args.png {
        config.images = true;
    }
    debug!("{:?}", config);

    let pool = sequence::thread_pool(args.threads).context("building thread pool")?;
    let summary = sequence::run(&config, &args.output, &pool)?;
    debug!("wrote {} files", summary.files.len());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Args::parse()) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
