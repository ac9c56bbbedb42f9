//! Whole-frame rendering.

use log::trace;
use rayon::prelude::{IndexedParallelIterator, ParallelIterator, ParallelSliceMut};

use crate::{camera::ScreenSize, config::RenderConfig, march::Marcher};

/// Distance and light fields for one frame, both row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameGrids {
    pub screen_size: ScreenSize,
    pub distance: Vec<f64>,
    pub light: Vec<f64>,
}

impl FrameGrids {
    pub fn new(screen_size: ScreenSize) -> Self {
        let len = screen_size.pixel_count();
        Self {
            screen_size,
            distance: vec![0.0; len],
            light: vec![0.0; len],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.screen_size.width as usize + x as usize
    }

    pub fn distance_at(&self, x: u32, y: u32) -> f64 {
        self.distance[self.index(x, y)]
    }

    pub fn light_at(&self, x: u32, y: u32) -> f64 {
        self.light[self.index(x, y)]
    }

    pub fn stats(&self, max_distance: f64) -> FrameStats {
        let hits = self
            .distance
            .iter()
            .filter(|distance| **distance < max_distance)
            .count();
        let min_distance = self.distance.iter().copied().fold(f64::INFINITY, f64::min);
        let min_light = self.light.iter().copied().fold(f64::INFINITY, f64::min);
        let max_light = self.light.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        FrameStats {
            hits,
            min_distance,
            min_light,
            max_light,
        }
    }
}

/// Summary of a rendered frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameStats {
    /// Pixels whose ray recorded a hit or glow sample.
    pub hits: usize,
    pub min_distance: f64,
    pub min_light: f64,
    pub max_light: f64,
}

/// Renders one frame. Rows are marched in parallel on the current rayon pool.
///
/// Expects a configuration that passed [`RenderConfig::validate`]; a zero
/// resolution yields empty grids.
pub fn render(config: &RenderConfig) -> FrameGrids {
    trace!("begin render");

    let marcher = Marcher::new(config);
    let screen_size = marcher.screen_size();
    let width = screen_size.width as usize;
    let mut grids = FrameGrids::new(screen_size);
    if width == 0 {
        return grids;
    }

    grids
        .distance
        .par_chunks_mut(width)
        .zip(grids.light.par_chunks_mut(width))
        .enumerate()
        .for_each(|(y, (distance_row, light_row))| {
            for (x, (distance, light)) in distance_row
                .iter_mut()
                .zip(light_row.iter_mut())
                .enumerate()
            {
                let sample = marcher.sample(x as u32, y as u32);
                *distance = sample.distance;
                *light = sample.light;
            }
        });

    trace!("end render");
    grids
}

/// Single-threaded reference renderer, filling pixels in row-major order.
///
/// Same preconditions as [`render`].
pub fn render_serial(config: &RenderConfig) -> FrameGrids {
    let marcher = Marcher::new(config);
    let screen_size = marcher.screen_size();
    let mut grids = FrameGrids::new(screen_size);
    for y in 0..screen_size.height {
        for x in 0..screen_size.width {
            let index = grids.index(x, y);
            let sample = marcher.sample(x, y);
            grids.distance[index] = sample.distance;
            grids.light[index] = sample.light;
        }
    }
    grids
}
