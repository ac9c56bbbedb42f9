//! Surface normals.

use crate::{distance, vector::Vector3};

/// Surface normal at `position` from central differences of the distance
/// estimator, `epsilon` apart along each axis.
pub fn estimate(position: Vector3, power: f64, epsilon: f64) -> Vector3 {
    let difference = |axis: Vector3| {
        distance::estimate(position.translate(axis, epsilon), power)
            - distance::estimate(position.translate(axis, -epsilon), power)
    };
    Vector3::new(
        difference(Vector3::X),
        difference(Vector3::Y),
        difference(Vector3::Z),
    )
    .normalize()
}
