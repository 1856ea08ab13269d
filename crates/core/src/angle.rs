use std::f64::consts::{PI, TAU};

/// Wraps an angle in radians into `[-π, π)`.
///
/// The result has the same sine and cosine as the input, up to rounding.
/// Non-finite input yields `NaN`.
#[must_use]
pub fn wrap_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(TAU) - PI
}
