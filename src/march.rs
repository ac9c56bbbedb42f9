//! Sphere tracing.

use bytemuck::{Pod, Zeroable};

use crate::{
    camera::{self, ScreenSize},
    config::RenderConfig,
    distance,
    lighting::Light,
    vector::{Matrix3, Vector3},
};

/// Multiples of the surface distance that count as a near miss, checked in order.
pub const GLOW_TIERS: [f64; 2] = [2.0, 3.0];

/// Result of marching one pixel's ray.
#[repr(C)]
#[derive(Pod, Zeroable, Clone, Copy, Debug, PartialEq)]
pub struct PixelSample {
    /// `max_distance` minus the distance travelled at the hit, or `max_distance` for a miss.
    pub distance: f64,
    /// Diffuse intensity at the hit, `0` for a miss.
    pub light: f64,
}

impl PixelSample {
    pub fn miss(max_distance: f64) -> Self {
        Self {
            distance: max_distance,
            light: 0.0,
        }
    }
}

/// Per-frame state shared by every pixel's march.
#[derive(Clone, Debug)]
pub struct Marcher {
    basis: Matrix3,
    screen_size: ScreenSize,
    focal_length: f64,
    vertical: f64,
    horizontal: f64,
    light: Light,
    camera: Vector3,
    power: f64,
    surface_distance: f64,
    epsilon: f64,
    max_steps: u32,
    max_distance: f64,
}

impl Marcher {
    /// Expects a configuration that passed [`RenderConfig::validate`].
    pub fn new(config: &RenderConfig) -> Self {
        let screen_size = config.screen_size();
        let vertical = config.vertical_radians();
        let horizontal = config.horizontal_radians();
        Self {
            basis: camera::view_basis(config.camera, config.target, config.up),
            screen_size,
            focal_length: camera::focal_length(screen_size, config.fov_radians()),
            vertical,
            horizontal,
            light: Light::new(config.light, vertical, horizontal),
            camera: config.camera,
            power: config.power,
            surface_distance: config.surface_distance,
            epsilon: config.epsilon,
            max_steps: config.max_steps,
            max_distance: config.max_distance,
        }
    }

    pub fn screen_size(&self) -> ScreenSize {
        self.screen_size
    }

    /**
    Marches the ray through pixel `(x, y)`.

    The ray is stepped in un-rotated view space; each step's position is then
    rotated by the rig angles before the distance estimator sees it, so the
    camera orbits the fractal rather than the ray turning.

    A step closer than a [`GLOW_TIERS`] multiple of the surface distance records
    a glow sample but keeps marching. A step closer than the surface distance
    itself records the final sample and stops.
    */
    pub fn sample(&self, x: u32, y: u32) -> PixelSample {
        let direction =
            camera::ray_direction(&self.basis, self.screen_size, self.focal_length, x, y);
        let rotated_direction = direction.rotate_camera(self.vertical, self.horizontal);

        let mut sample = PixelSample::miss(self.max_distance);
        let mut travelled = 0.0;

        for _ in 0..self.max_steps {
            let position = self.march_position(direction, travelled);
            let step = distance::estimate(position, self.power);
            travelled += step;

            let proximity = self.proximity(step);
            if let Some(offset) = proximity.back_off(self.epsilon) {
                let backed_off = position.translate(rotated_direction, offset);
                sample = self.hit(backed_off, travelled);
            }

            if proximity == Proximity::Surface || travelled > self.max_distance {
                break;
            }
        }

        sample
    }

    /// Rig-rotated position after travelling `travelled` along the un-rotated `direction`.
    fn march_position(&self, direction: Vector3, travelled: f64) -> Vector3 {
        self.camera
            .translate(direction, travelled)
            .rotate_camera(self.vertical, self.horizontal)
    }

    fn proximity(&self, step: f64) -> Proximity {
        if step < self.surface_distance {
            Proximity::Surface
        } else if GLOW_TIERS
            .iter()
            .any(|tier| step < tier * self.surface_distance)
        {
            Proximity::Glow
        } else {
            Proximity::Far
        }
    }

    fn hit(&self, position: Vector3, travelled: f64) -> PixelSample {
        PixelSample {
            distance: self.max_distance - travelled,
            light: self.light.intensity_at(position, self.power, self.epsilon),
        }
    }
}

/// How close one marching step came to the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Proximity {
    Surface,
    Glow,
    Far,
}

impl Proximity {
    /// Signed offset along the rotated ray to shade at, if this step records a sample.
    fn back_off(self, epsilon: f64) -> Option<f64> {
        match self {
            Proximity::Surface => Some(-epsilon),
            Proximity::Glow => Some(epsilon),
            Proximity::Far => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> RenderConfig {
        RenderConfig {
            resolution: 32,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn centre_ray_hits_the_bulb() {
        let marcher = Marcher::new(&small_config());
        let sample = marcher.sample(16, 16);
        assert!(sample.distance < 5.0, "{:?}", sample);
        assert!((0.0..=1.0).contains(&sample.light), "{:?}", sample);
    }

    #[test]
    fn ray_facing_away_misses() {
        let config = RenderConfig {
            target: Vector3::new(0.0, 0.0, 5.0),
            ..small_config()
        };
        let marcher = Marcher::new(&config);
        for (x, y) in [(0, 0), (16, 16), (31, 0), (5, 27)] {
            assert_eq!(marcher.sample(x, y), PixelSample::miss(5.0));
        }
    }

    #[test]
    fn single_step_budget_cannot_reach_surface() {
        let config = RenderConfig {
            max_steps: 1,
            ..small_config()
        };
        let marcher = Marcher::new(&config);
        assert_eq!(marcher.sample(16, 16), PixelSample::miss(5.0));
    }

    const PIXEL: (u32, u32) = (20, 11);

    /// Off-axis camera inside the bailout radius, so the first estimate depends
    /// on direction and not only on distance from the origin.
    fn near_config(surface_distance: f64, max_distance: f64, max_steps: u32) -> RenderConfig {
        RenderConfig {
            camera: Vector3::new(0.0, 0.4, 1.6),
            epsilon: 0.01,
            surface_distance,
            max_distance,
            max_steps,
            ..small_config()
        }
    }

    /// First march position and the rotated ray direction, computed by hand.
    fn first_step(config: &RenderConfig) -> (Vector3, Vector3) {
        let screen_size = config.screen_size();
        let basis = camera::view_basis(config.camera, config.target, config.up);
        let direction = camera::ray_direction(
            &basis,
            screen_size,
            camera::focal_length(screen_size, config.fov_radians()),
            PIXEL.0,
            PIXEL.1,
        );
        let (vertical, horizontal) = (config.vertical_radians(), config.horizontal_radians());
        (
            config.camera.rotate_camera(vertical, horizontal),
            direction.rotate_camera(vertical, horizontal),
        )
    }

    fn expected(config: &RenderConfig, shade_at: Vector3, travelled: f64) -> PixelSample {
        let light = Light::new(
            config.light,
            config.vertical_radians(),
            config.horizontal_radians(),
        );
        PixelSample {
            distance: config.max_distance - travelled,
            light: light.intensity_at(shade_at, config.power, config.epsilon),
        }
    }

    fn assert_same_bits(actual: PixelSample, expected: PixelSample) {
        assert_eq!(
            bytemuck::bytes_of(&actual),
            bytemuck::bytes_of(&expected),
            "{:?} != {:?}",
            actual,
            expected
        );
    }

    fn first_estimate() -> f64 {
        let config = near_config(0.001, 5.0, 1);
        let (position, _) = first_step(&config);
        let estimate = distance::estimate(position, config.power);
        assert!(estimate > 0.0, "{}", estimate);
        estimate
    }

    #[test]
    fn march_rotates_position_not_camera_origin() {
        let config = near_config(10.0, 5.0, 100);
        let (position, rotated_direction) = first_step(&config);
        let step = distance::estimate(position, config.power);
        assert_ne!(step, distance::estimate(config.camera, config.power));

        let sample = Marcher::new(&config).sample(PIXEL.0, PIXEL.1);
        let shade_at = position.translate(rotated_direction, -config.epsilon);
        assert_same_bits(sample, expected(&config, shade_at, step));
    }

    #[test]
    fn glow_tiers_back_off_forwards() {
        let step = first_estimate();
        for tier in GLOW_TIERS {
            let config = near_config(step / (tier - 0.5), 5.0, 1);
            let marcher = Marcher::new(&config);
            assert_eq!(marcher.proximity(step), Proximity::Glow, "tier {}", tier);

            let (position, rotated_direction) = first_step(&config);
            let shade_at = position.translate(rotated_direction, config.epsilon);
            assert_same_bits(
                marcher.sample(PIXEL.0, PIXEL.1),
                expected(&config, shade_at, step),
            );
        }
    }

    #[test]
    fn glow_sample_survives_leaving_the_distance_budget() {
        let step = first_estimate();
        let config = near_config(step / 1.5, step / 2.0, 100);
        let (position, rotated_direction) = first_step(&config);

        let sample = Marcher::new(&config).sample(PIXEL.0, PIXEL.1);
        assert!(sample.distance < 0.0, "{:?}", sample);
        let shade_at = position.translate(rotated_direction, config.epsilon);
        assert_same_bits(sample, expected(&config, shade_at, step));
    }

    #[test]
    fn proximity_tiers() {
        let marcher = Marcher::new(&near_config(0.5, 5.0, 1));
        assert_eq!(marcher.proximity(0.49), Proximity::Surface);
        assert_eq!(marcher.proximity(0.5), Proximity::Glow);
        assert_eq!(marcher.proximity(0.99), Proximity::Glow);
        assert_eq!(marcher.proximity(1.49), Proximity::Glow);
        assert_eq!(marcher.proximity(1.5), Proximity::Far);

        assert_eq!(Proximity::Surface.back_off(0.25), Some(-0.25));
        assert_eq!(Proximity::Glow.back_off(0.25), Some(0.25));
        assert_eq!(Proximity::Far.back_off(0.25), None);
    }
}
