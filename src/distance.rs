//! Mandelbulb distance estimator.

use crate::vector::Vector3;

/// Fixed iteration budget of the escape-time loop.
pub const ITERATIONS: usize = 15;

/// Magnitude past which a point has escaped.
pub const BAILOUT: f64 = 2.0;

/**
Lower-bound estimate of the distance from `position` to the Mandelbulb of the
given `power`.

Each iteration raises the working point to `power` in spherical coordinates
and adds the original `position` back in, tracking the running derivative
`dr` alongside. The result `0.5 * ln(r) * r / dr` is conservative: a ray may
advance by it without passing through the surface. Points inside the set
produce negative or zero estimates.

The origin is a fixed point of the iteration (`r` stays at zero) and is
reported as lying on the surface.
*/
pub fn estimate(position: Vector3, power: f64) -> f64 {
    let mut working = position;
    let mut dr = 1.0;
    let mut r: f64 = 0.0;

    for _ in 0..ITERATIONS {
        r = working.magnitude();
        if r > BAILOUT {
            break;
        }

        dr = power * r.powf(power - 1.0) * dr + 1.0;

        let theta = if r > 0.0 {
            (working.z / r).acos() * power
        } else {
            0.0
        };
        let phi = working.y.atan2(working.x) * power;
        let zr = r.powf(power);

        working = Vector3::new(
            zr * theta.sin() * phi.cos(),
            zr * theta.sin() * phi.sin(),
            zr * theta.cos(),
        ) + position;
    }

    if r == 0.0 {
        return 0.0;
    }
    0.5 * r.ln() * r / dr
}
