use thiserror::Error;

use crate::{Params, State};

/// A position in meters relative to the hinge.
///
/// `x` grows to the right and `y` grows downward, so a bob hanging at rest
/// sits at `(0, l)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Positions of both bobs.
///
/// For a single pendulum `second` equals `first`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Positions {
    pub first: Point,
    pub second: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PositionError {
    #[error("bob position is not finite ({x}, {y})")]
    NonFinite { x: f64, y: f64 },
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Positions {
    /// Position of the outermost bob, the one a trail follows.
    #[must_use]
    pub fn tip(&self) -> Point {
        self.second
    }
}

/// Computes bob positions from the angular state and rod lengths.
///
/// # Errors
///
/// Returns [`PositionError::NonFinite`] if either bob lands at a non-finite
/// coordinate.
pub fn positions(state: &State, params: &Params) -> Result<Positions, PositionError> {
    let first = bob(Point::default(), params.l1, state.first().0);
    let second = match state.second() {
        Some((theta2, _)) => bob(first, params.l2, theta2),
        None => first,
    };

    for p in [first, second] {
        if !p.is_finite() {
            return Err(PositionError::NonFinite { x: p.x, y: p.y });
        }
    }

    Ok(Positions { first, second })
}

fn bob(pivot: Point, length: f64, theta: f64) -> Point {
    let (sin, cos) = theta.sin_cos();
    Point::new(pivot.x + length * sin, pivot.y + length * cos)
}
