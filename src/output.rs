//! Text encoding of frame grids.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    frame::FrameGrids,
};

/// Traversal order used when writing a row-major grid.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GridLayout {
    /// Line `i` holds column `i` of the grid.
    #[default]
    Transposed,
    /// Line `i` holds row `i` of the grid.
    RowMajor,
}

impl GridLayout {
    /// Value at position `item` of output line `line` in a `side` x `side` row-major grid.
    pub fn value(self, grid: &[f64], side: usize, line: usize, item: usize) -> f64 {
        match self {
            GridLayout::Transposed => grid[item * side + line],
            GridLayout::RowMajor => grid[line * side + item],
        }
    }
}

/// `<prefix>_NNN.txt`, with the frame index zero-padded to three digits.
pub fn frame_file_name(prefix: &str, frame: u32) -> String {
    format!("{}_{:03}.txt", prefix, frame)
}

pub fn distance_path(directory: &Path, frame: u32) -> PathBuf {
    directory.join(frame_file_name("distance", frame))
}

pub fn light_path(directory: &Path, frame: u32) -> PathBuf {
    directory.join(frame_file_name("light", frame))
}

/// Writes a square `side` x `side` row-major grid as comma-separated text.
pub fn encode_grid<W: Write>(
    writer: &mut W,
    grid: &[f64],
    side: usize,
    layout: GridLayout,
) -> std::io::Result<()> {
    debug_assert_eq!(grid.len(), side * side);

    for line in 0..side {
        for item in 0..side {
            let value = layout.value(grid, side, line, item);
            if item + 1 < side {
                write!(writer, "{}, ", value)?;
            } else {
                writeln!(writer, "{}", value)?;
            }
        }
    }
    Ok(())
}

fn write_grid(path: &Path, grid: &[f64], side: usize, layout: GridLayout) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    encode_grid(&mut writer, grid, side, layout).map_err(|e| Error::io(path, e))?;
    writer.flush().map_err(|e| Error::io(path, e))
}

/// Writes both grids of frame `frame` into `directory`, returning the paths written.
pub fn write_frame(
    directory: &Path,
    frame: u32,
    grids: &FrameGrids,
    layout: GridLayout,
) -> Result<[PathBuf; 2]> {
    let side = grids.screen_size.width as usize;
    let distance = distance_path(directory, frame);
    let light = light_path(directory, frame);
    write_grid(&distance, &grids.distance, side, layout)?;
    write_grid(&light, &grids.light, side, layout)?;
    Ok([distance, light])
}
