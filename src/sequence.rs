//! Frame-sequence driver.

use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use log::{debug, info};

use crate::{
    config::RenderConfig,
    error::{Error, Result},
    frame, image, output,
};

/// What a completed run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub frames: u32,
    pub files: Vec<PathBuf>,
    pub elapsed: Duration,
}

/// Empties `directory`, creating it if it does not exist.
pub fn prepare_output_dir(directory: &Path) -> Result<()> {
    if directory.exists() {
        let entries = std::fs::read_dir(directory).map_err(|e| Error::io(directory, e))?;
        for entry in entries {
            let path = entry.map_err(|e| Error::io(directory, e))?.path();
            let removed = if path.is_dir() {
                std::fs::remove_dir_all(&path)
            } else {
                std::fs::remove_file(&path)
            };
            removed.map_err(|e| Error::io(&path, e))?;
        }
    }
    std::fs::create_dir_all(directory).map_err(|e| Error::io(directory, e))
}

/// Subdirectory of the output directory that holds PNG previews.
pub const IMAGES_DIR: &str = "images";

/// Renders every frame of `config` into `directory` on `pool`.
///
/// The first error aborts the run. Each frame's files are written before the
/// next frame is rendered. With `config.images` set, previews go to
/// [`IMAGES_DIR`] inside `directory`.
pub fn run(
    config: &RenderConfig,
    directory: &Path,
    pool: &rayon::ThreadPool,
) -> Result<RunSummary> {
    config.validate()?;

    let start = Instant::now();
    info!("Raymarching Mandelbulb Fractal...");

    prepare_output_dir(directory)?;
    info!("Cleared output directory {}", directory.display());
    info!("Total frames: {}", config.frames);

    let images_dir = directory.join(IMAGES_DIR);
    if config.images {
        std::fs::create_dir_all(&images_dir).map_err(|e| Error::io(&images_dir, e))?;
    }

    let mut files = Vec::with_capacity(config.frames as usize * 2);
    for index in 0..config.frames {
        let frame_config = config.for_frame(index);
        frame_config.validate()?;

        let frame_start = Instant::now();
        let grids = pool.install(|| frame::render(&frame_config));
        debug!(
            "frame {:03}: {:?} in {:?}",
            index,
            grids.stats(frame_config.max_distance),
            frame_start.elapsed()
        );

        files.extend(output::write_frame(
            directory,
            index,
            &grids,
            frame_config.layout,
        )?);
        if frame_config.images {
            files.extend(image::write_frame_images(
                &images_dir,
                index,
                &grids,
                frame_config.layout,
            )?);
        }
    }

    let elapsed = start.elapsed();
    info!("Elapsed time: {} seconds", elapsed.as_secs());
    Ok(RunSummary {
        frames: config.frames,
        files,
        elapsed,
    })
}

/// Builds a rayon pool with `threads` workers, or one per CPU.
pub fn thread_pool(
    threads: Option<usize>,
) -> std::result::Result<rayon::ThreadPool, rayon::ThreadPoolBuildError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.unwrap_or_else(num_cpus::get))
        .thread_name(|index| format!("raymarch-{}", index))
        .build()
}
