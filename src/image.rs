//! False-colour PNG previews of frame grids.
//!
//! Each frame gets three images: the distance field, the light field, and
//! their sum. All three use a random 256-entry palette seeded by the frame index.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    error::{Error, Result},
    frame::FrameGrids,
    output::GridLayout,
};

pub const PALETTE_SIZE: usize = 256;

/// `<prefix>_NNN.png`, with the frame index zero-padded to three digits.
pub fn image_file_name(prefix: &str, frame: u32) -> String {
    format!("{}_{:03}.png", prefix, frame)
}

/// Random colour map for `frame`. The same frame always gets the same palette.
pub fn palette(frame: u32) -> Vec<Rgb<u8>> {
    let mut rng = StdRng::seed_from_u64(frame as u64);
    (0..PALETTE_SIZE)
        .map(|_| Rgb([rng.gen(), rng.gen(), rng.gen()]))
        .collect()
}

/**
Maps a square row-major grid onto `palette`.

Values are scaled linearly from the grid's minimum (first entry) to its
maximum (last entry). A flat grid uses the first entry throughout. The image is
laid out the way the text files read: output line `i` of `layout` becomes
image row `side - 1 - i`, so line 0 sits at the bottom.
*/
pub fn colourize(grid: &[f64], side: usize, layout: GridLayout, palette: &[Rgb<u8>]) -> RgbImage {
    let (min, max) = grid
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), value| {
            (min.min(value), max.max(value))
        });
    let range = max - min;
    let top = palette.len() - 1;

    let mut img = RgbImage::new(side as u32, side as u32);
    for line in 0..side {
        for item in 0..side {
            let value = layout.value(grid, side, line, item);
            let index = if range > 0.0 && value.is_finite() {
                (((value - min) / range) * top as f64).round() as usize
            } else {
                0
            };
            img.put_pixel(item as u32, (side - 1 - line) as u32, palette[index.min(top)]);
        }
    }
    img
}

fn save(img: &RgbImage, path: PathBuf) -> Result<PathBuf> {
    img.save(&path).map_err(|source| Error::Image {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Writes `distance_NNN.png`, `light_NNN.png` and `mandelbulb_NNN.png` into `directory`.
pub fn write_frame_images(
    directory: &Path,
    frame: u32,
    grids: &FrameGrids,
    layout: GridLayout,
) -> Result<[PathBuf; 3]> {
    let side = grids.screen_size.width as usize;
    let palette = palette(frame);
    let combined: Vec<f64> = grids
        .distance
        .iter()
        .zip(&grids.light)
        .map(|(distance, light)| distance + light)
        .collect();

    Ok([
        save(
            &colourize(&grids.distance, side, layout, &palette),
            directory.join(image_file_name("distance", frame)),
        )?,
        save(
            &colourize(&grids.light, side, layout, &palette),
            directory.join(image_file_name("light", frame)),
        )?,
        save(
            &colourize(&combined, side, layout, &palette),
            directory.join(image_file_name("mandelbulb", frame)),
        )?,
    ])
}
