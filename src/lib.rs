//! Distance and light fields of the Mandelbulb, rendered by sphere tracing.

pub mod camera;
pub mod config;
pub mod distance;
pub mod error;
pub mod frame;
pub mod image;
pub mod lighting;
pub mod march;
pub mod normal;
pub mod output;
pub mod sequence;
pub mod vector;

pub use config::{FrameSchedule, RenderConfig};
pub use error::{Error, Result};
pub use frame::{render, FrameGrids, FrameStats};
pub use march::{Marcher, PixelSample};
pub use output::GridLayout;
pub use vector::{Matrix3, Vector3};
