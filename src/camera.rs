//! Camera basis and primary ray directions.

use crate::vector::{Matrix3, Vector3};

/// Square render target dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn square(resolution: u32) -> Self {
        Self {
            width: resolution,
            height: resolution,
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/**
Builds the view basis for a camera at `camera` looking at `target`.

The rows of the returned matrix are `right`, `up` and `forward`, in that order.
`up` must not be parallel to the camera-to-target direction (and neither may be
zero); otherwise `right` collapses to the zero vector. [`RenderConfig::validate`]
rejects such configurations before they reach here.

[`RenderConfig::validate`]: crate::config::RenderConfig::validate
*/
pub fn view_basis(camera: Vector3, target: Vector3, up: Vector3) -> Matrix3 {
    let forward = (target - camera).normalize();
    let right = forward.cross(up).normalize();
    let up = right.cross(forward);
    Matrix3::from_rows(right, up, forward)
}

/// Distance from the eye to the image plane, in pixels.
pub fn focal_length(screen_size: ScreenSize, fov: f64) -> f64 {
    screen_size.height as f64 / fov.tan()
}

/// World-space direction of the primary ray through pixel `(x, y)`.
pub fn ray_direction(
    basis: &Matrix3,
    screen_size: ScreenSize,
    focal_length: f64,
    x: u32,
    y: u32,
) -> Vector3 {
    let view = Vector3::new(
        x as f64 - screen_size.width as f64 / 2.0,
        y as f64 - screen_size.height as f64 / 2.0,
        focal_length,
    )
    .normalize();
    *basis * view
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn reference_basis_is_orthonormal() {
        let basis = view_basis(Vector3::new(0.0, 0.0, 2.5), Vector3::ZERO, Vector3::X);
        for row in basis.rows {
            assert!((row.magnitude() - 1.0).abs() < TOLERANCE, "{:?}", row);
        }
        let [right, up, forward] = basis.rows;
        assert!(right.dot(up).abs() < TOLERANCE);
        assert!(right.dot(forward).abs() < TOLERANCE);
        assert!(up.dot(forward).abs() < TOLERANCE);
    }

    #[test]
    fn reference_basis_rows() {
        let basis = view_basis(Vector3::new(0.0, 0.0, 2.5), Vector3::ZERO, Vector3::X);
        assert_eq!(basis.rows[2], Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(basis.rows[0], Vector3::new(0.0, -1.0, 0.0));
        assert_eq!(basis.rows[1], Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn parallel_up_collapses_right() {
        let basis = view_basis(Vector3::new(0.0, 0.0, 2.5), Vector3::ZERO, Vector3::Z);
        assert_eq!(basis.rows[0], Vector3::ZERO);
    }

    #[test]
    fn centre_pixel_looks_forward() {
        let camera = Vector3::new(0.0, 0.0, 2.5);
        let basis = view_basis(camera, Vector3::ZERO, Vector3::X);
        let screen_size = ScreenSize::square(100);
        let focal_length = focal_length(screen_size, 45f64.to_radians());
        let direction = ray_direction(&basis, screen_size, focal_length, 50, 50);
        assert!((direction - Vector3::new(0.0, 0.0, -1.0)).magnitude() < TOLERANCE);

        let corner = ray_direction(&basis, screen_size, focal_length, 0, 0);
        assert!((corner.magnitude() - 1.0).abs() < TOLERANCE);
        assert!(corner.z < 0.0);
    }

    #[test]
    fn focal_length_at_45_degrees_equals_height() {
        let focal_length = focal_length(ScreenSize::square(1000), 45f64.to_radians());
        assert!((focal_length - 1000.0).abs() < 1e-9);
    }
}
