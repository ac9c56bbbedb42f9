//! Render configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    camera::ScreenSize,
    error::{Error, Result},
    output::GridLayout,
    vector::Vector3,
};

/// How the scene changes from one frame to the next.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameSchedule {
    /// Every frame renders the same scene.
    #[default]
    Static,
    /// The horizontal rig angle advances by a fixed step each frame.
    HorizontalSweep { degrees_per_frame: f64 },
}

/// Everything needed to render a frame. Angles are in degrees.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Mandelbulb exponent.
    pub power: f64,
    pub camera: Vector3,
    pub target: Vector3,
    pub up: Vector3,
    /// Point light position before the rig rotation.
    pub light: Vector3,
    pub horizontal_angle: f64,
    pub vertical_angle: f64,
    pub fov: f64,
    /// Width and height of the square output grids.
    pub resolution: u32,
    /// DE value below which a ray counts as a surface hit.
    pub surface_distance: f64,
    /// Normal-estimation and back-off step.
    pub epsilon: f64,
    pub max_steps: u32,
    pub max_distance: f64,
    pub frames: u32,
    pub schedule: FrameSchedule,
    pub layout: GridLayout,
    /// Also write false-colour PNG previews of each frame.
    pub images: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            power: 8.0,
            camera: Vector3::new(0.0, 0.0, 2.5),
            target: Vector3::ZERO,
            up: Vector3::X,
            light: Vector3::new(1.5, 1.0, 3.0),
            horizontal_angle: 25.0,
            vertical_angle: -15.0,
            fov: 45.0,
            resolution: 1000,
            surface_distance: 0.001,
            epsilon: 0.0001,
            max_steps: 100,
            max_distance: 5.0,
            frames: 1,
            schedule: FrameSchedule::Static,
            layout: GridLayout::Transposed,
            images: false,
        }
    }
}

impl RenderConfig {
    /// Load a configuration from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn screen_size(&self) -> ScreenSize {
        ScreenSize::square(self.resolution)
    }

    pub fn horizontal_radians(&self) -> f64 {
        self.horizontal_angle.to_radians()
    }

    pub fn vertical_radians(&self) -> f64 {
        self.vertical_angle.to_radians()
    }

    pub fn fov_radians(&self) -> f64 {
        self.fov.to_radians()
    }

    /// The configuration to render frame `index` with.
    pub fn for_frame(&self, index: u32) -> RenderConfig {
        let mut config = self.clone();
        match self.schedule {
            FrameSchedule::Static => {}
            FrameSchedule::HorizontalSweep { degrees_per_frame } => {
                config.horizontal_angle += degrees_per_frame * index as f64;
            }
        }
        config
    }

    /// Checks the preconditions the renderer relies on.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfig(message));

        for (name, vector) in [
            ("camera", self.camera),
            ("target", self.target),
            ("up", self.up),
            ("light", self.light),
        ] {
            if !vector.is_finite() {
                return invalid(format!(
                    "{} has a non-finite component: {:?}",
                    name, vector
                ));
            }
        }

        for (name, value) in [
            ("power", self.power),
            ("surface_distance", self.surface_distance),
            ("epsilon", self.epsilon),
            ("max_distance", self.max_distance),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return invalid(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                ));
            }
        }

        if !self.horizontal_angle.is_finite() || !self.vertical_angle.is_finite() {
            return invalid("camera angles must be finite".to_string());
        }
        if let FrameSchedule::HorizontalSweep { degrees_per_frame } = self.schedule {
            if !degrees_per_frame.is_finite() {
                return invalid("degrees_per_frame must be finite".to_string());
            }
        }
        if !(self.fov > 0.0 && self.fov < 90.0) {
            return invalid(format!(
                "fov must lie strictly between 0 and 90 degrees, got {}",
                self.fov
            ));
        }
        if self.resolution == 0 {
            return invalid("resolution must be at least 1".to_string());
        }
        if self.max_steps == 0 {
            return invalid("max_steps must be at least 1".to_string());
        }

        let view = self.target - self.camera;
        if view.magnitude() == 0.0 {
            return invalid("camera and target coincide".to_string());
        }
        if self.up.magnitude() == 0.0 {
            return invalid("up vector is zero".to_string());
        }
        if view.normalize().cross(self.up.normalize()).magnitude() < 1e-9 {
            return invalid(format!(
                "up vector {:?} is parallel to the camera-to-target direction",
                self.up
            ));
        }

        Ok(())
    }
}
