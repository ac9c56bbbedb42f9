//! Diffuse lighting.

use crate::{
    normal,
    vector::{clamp_unit, Vector3},
};

/// A point light that travels with the camera rig.
#[derive(Clone, Copy, Debug)]
pub struct Light {
    /// Light position after the rig rotation has been applied.
    pub position: Vector3,
}

impl Light {
    /// Rotates `position` by the rig's `vertical` and `horizontal` angles (radians).
    pub fn new(position: Vector3, vertical: f64, horizontal: f64) -> Self {
        Self {
            position: position.rotate_camera(vertical, horizontal),
        }
    }

    /// Lambertian intensity in `[0, 1]` for a surface point with the given `normal`.
    pub fn diffuse(&self, point: Vector3, normal: Vector3) -> f64 {
        let to_light = (self.position - point).normalize();
        clamp_unit(to_light.dot(normal))
    }

    /// Estimates the surface normal at `point` and shades it.
    pub fn intensity_at(&self, point: Vector3, power: f64, epsilon: f64) -> f64 {
        self.diffuse(point, normal::estimate(point, power, epsilon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_light_is_fully_lit() {
        let light = Light::new(Vector3::new(0.0, 0.0, 5.0), 0.0, 0.0);
        assert_eq!(light.diffuse(Vector3::ZERO, Vector3::Z), 1.0);
    }

    #[test]
    fn facing_away_is_dark() {
        let light = Light::new(Vector3::new(0.0, 0.0, 5.0), 0.0, 0.0);
        assert_eq!(light.diffuse(Vector3::ZERO, -Vector3::Z), 0.0);
        assert_eq!(light.diffuse(Vector3::ZERO, Vector3::X), 0.0);
    }

    #[test]
    fn light_follows_rig_rotation() {
        let quarter = std::f64::consts::FRAC_PI_2;
        let light = Light::new(Vector3::new(0.0, 0.0, 5.0), 0.0, quarter);
        assert!((light.position - Vector3::new(5.0, 0.0, 0.0)).magnitude() < 1e-12);
        assert!(light.diffuse(Vector3::ZERO, Vector3::X) > 0.999);
    }

    #[test]
    fn intensity_is_in_unit_range() {
        let light = Light::new(Vector3::new(1.5, 1.0, 3.0), -0.26, 0.44);
        for point in [
            Vector3::new(0.0, 0.0, 1.2),
            Vector3::new(0.5, -0.5, 0.9),
            Vector3::new(-1.0, 0.2, 0.1),
        ] {
            let intensity = light.intensity_at(point, 8.0, 1e-4);
            assert!((0.0..=1.0).contains(&intensity), "{}", intensity);
        }
    }
}
