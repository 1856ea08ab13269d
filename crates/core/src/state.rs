use std::f64::consts::PI;

use thiserror::Error;

use crate::{Mode, StepIntegrable, angle::wrap_angle};

/// Angle given to the second segment whenever it is created or reset.
///
/// Never zero, a straight-down second segment starting at rest on a
/// straight-down first segment would never move.
pub const SECOND_SEGMENT_ANGLE: f64 = -30.0 * PI / 180.0;

/// Canonical starting angle of the first segment.
pub const FIRST_SEGMENT_ANGLE: f64 = 45.0 * PI / 180.0;

/// Angular state of a single or double pendulum.
///
/// Components are stored as `(angle, angular velocity)` pairs per segment,
/// angles measured in radians from the downward vertical:
///
/// - `Single`: `[θ, ω]`
/// - `Double`: `[θ1, ω1, θ2, ω2]`
///
/// The same type is used for the time derivative of a state, where each
/// component holds the rate of change of the matching state component.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-derive", serde(try_from = "Vec<f64>", into = "Vec<f64>"))]
pub enum State {
    Single([f64; 2]),
    Double([f64; 4]),
}

/// Errors raised when building a [`State`] from untyped data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("state must hold 2 or 4 components, got {0}")]
    Length(usize),

    #[error("state mode {found} does not match session mode {expected}")]
    ModeMismatch { expected: Mode, found: Mode },
}

impl State {
    /// Creates a single pendulum state.
    #[must_use]
    pub fn single(theta: f64, omega: f64) -> Self {
        Self::Single([theta, omega])
    }

    /// Creates a double pendulum state.
    #[must_use]
    pub fn double(theta1: f64, omega1: f64, theta2: f64, omega2: f64) -> Self {
        Self::Double([theta1, omega1, theta2, omega2])
    }

    /// Returns the canonical resting-start condition for a mode.
    #[must_use]
    pub fn initial(mode: Mode) -> Self {
        match mode {
            Mode::Single => Self::single(FIRST_SEGMENT_ANGLE, 0.0),
            Mode::Double => Self::double(FIRST_SEGMENT_ANGLE, 0.0, SECOND_SEGMENT_ANGLE, 0.0),
        }
    }

    /// Builds a state from a slice of 2 or 4 components.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Length`] for any other length.
    pub fn from_slice(values: &[f64]) -> Result<Self, StateError> {
        match *values {
            [theta, omega] => Ok(Self::single(theta, omega)),
            [theta1, omega1, theta2, omega2] => Ok(Self::double(theta1, omega1, theta2, omega2)),
            _ => Err(StateError::Length(values.len())),
        }
    }

    /// Components in `(angle, angular velocity)` order per segment.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Self::Single(s) => s,
            Self::Double(s) => s,
        }
    }

    /// Mode matching the number of segments.
    #[must_use]
    pub fn mode(&self) -> Mode {
        match self {
            Self::Single(_) => Mode::Single,
            Self::Double(_) => Mode::Double,
        }
    }

    /// Number of components, 2 or 4.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Always `false`, a state holds at least one segment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Angle and angular velocity of the first segment.
    #[must_use]
    pub fn first(&self) -> (f64, f64) {
        let s = self.as_slice();
        (s[0], s[1])
    }

    /// Angle and angular velocity of the second segment, if present.
    #[must_use]
    pub fn second(&self) -> Option<(f64, f64)> {
        match self {
            Self::Single(_) => None,
            Self::Double([_, _, theta2, omega2]) => Some((*theta2, *omega2)),
        }
    }

    /// Largest angular speed magnitude across all segments.
    #[must_use]
    pub fn max_angular_speed(&self) -> f64 {
        match self {
            Self::Single([_, omega]) => omega.abs(),
            Self::Double([_, omega1, _, omega2]) => omega1.abs().max(omega2.abs()),
        }
    }

    /// Returns `true` if every component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.as_slice().iter().all(|v| v.is_finite())
    }

    /// Wraps every angle into `[-π, π)`, leaving angular velocities alone.
    #[must_use]
    pub fn normalized(&self) -> Self {
        match *self {
            Self::Single([theta, omega]) => Self::single(wrap_angle(theta), omega),
            Self::Double([theta1, omega1, theta2, omega2]) => {
                Self::double(wrap_angle(theta1), omega1, wrap_angle(theta2), omega2)
            }
        }
    }

    /// Converts the state to another mode.
    ///
    /// The first segment is kept as is. Going to double mode appends a
    /// second segment at [`SECOND_SEGMENT_ANGLE`] with zero velocity; going
    /// to single mode drops it.
    #[must_use]
    pub fn into_mode(self, mode: Mode) -> Self {
        let (theta, omega) = self.first();
        match mode {
            Mode::Single => Self::single(theta, omega),
            Mode::Double => match self {
                Self::Double(_) => self,
                Self::Single(_) => Self::double(theta, omega, SECOND_SEGMENT_ANGLE, 0.0),
            },
        }
    }

    /// Applies `f` component-wise to `self` and `other`.
    ///
    /// The result has the shape of `self`. Components missing from `other`
    /// are read as zero.
    #[must_use]
    pub fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        let rhs = other.as_slice();
        let at = |i: usize| rhs.get(i).copied().unwrap_or(0.0);
        match *self {
            Self::Single([a, b]) => Self::Single([f(a, at(0)), f(b, at(1))]),
            Self::Double([a, b, c, d]) => {
                Self::Double([f(a, at(0)), f(b, at(1)), f(c, at(2)), f(d, at(3))])
            }
        }
    }
}

impl StepIntegrable<f64> for State {
    type Derivative = State;

    fn step(&self, derivative: State, delta: f64) -> Self {
        self.zip_with(&derivative, |s, d| s + d * delta)
    }
}

impl TryFrom<Vec<f64>> for State {
    type Error = StateError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_slice(&values)
    }
}

impl From<State> for Vec<f64> {
    fn from(state: State) -> Self {
        state.as_slice().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn from_slice_accepts_two_or_four() {
        assert_eq!(State::from_slice(&[1.0, 2.0]), Ok(State::single(1.0, 2.0)));
        assert_eq!(
            State::from_slice(&[1.0, 2.0, 3.0, 4.0]),
            Ok(State::double(1.0, 2.0, 3.0, 4.0))
        );
        assert_eq!(State::from_slice(&[1.0, 2.0, 3.0]), Err(StateError::Length(3)));
        assert_eq!(State::from_slice(&[]), Err(StateError::Length(0)));
    }

    #[test]
    fn slice_length_and_mode_agree() {
        let single = State::single(0.1, 0.2);
        assert_eq!(single.as_slice(), &[0.1, 0.2]);
        assert_eq!(single.len(), 2);
        assert_eq!(single.mode(), Mode::Single);

        let double = State::double(0.1, 0.2, 0.3, 0.4);
        assert_eq!(double.as_slice(), &[0.1, 0.2, 0.3, 0.4]);
        assert_eq!(double.len(), double.mode().state_len());
        assert_eq!(double.mode(), Mode::Double);
    }

    #[test]
    fn initial_state_matches_mode() {
        let single = State::initial(Mode::Single);
        let double = State::initial(Mode::Double);

        assert_eq!(single.len(), 2);
        assert_eq!(double.len(), 4);
        assert_relative_eq!(single.first().0, 45f64.to_radians());
        assert_relative_eq!(double.second().unwrap().0, (-30f64).to_radians());
    }

    #[test]
    fn max_angular_speed_uses_both_segments() {
        assert_relative_eq!(State::single(0.0, -3.0).max_angular_speed(), 3.0);
        assert_relative_eq!(State::double(0.0, 1.0, 0.0, -7.5).max_angular_speed(), 7.5);
    }

    #[test]
    fn into_mode_keeps_first_segment() {
        let double = State::double(1.25, -0.5, 2.0, 3.0);

        let single = double.into_mode(Mode::Single);
        assert_eq!(single, State::single(1.25, -0.5));

        let back = single.into_mode(Mode::Double);
        assert_eq!(back, State::double(1.25, -0.5, SECOND_SEGMENT_ANGLE, 0.0));
        assert!(back.second().unwrap().0 != 0.0);
    }

    #[test]
    fn into_same_mode_is_identity() {
        let double = State::double(1.0, 2.0, 3.0, 4.0);
        assert_eq!(double.into_mode(Mode::Double), double);
    }

    #[test]
    fn normalized_wraps_angles_only() {
        let state = State::double(3.0 * PI, 10.0, -2.5 * PI, -10.0);
        let wrapped = state.normalized();

        let [theta1, omega1, theta2, omega2] = match wrapped {
            State::Double(s) => s,
            State::Single(_) => panic!("mode changed"),
        };
        assert_relative_eq!(theta1.abs(), PI, epsilon = 1e-12);
        assert_relative_eq!(theta2, -0.5 * PI, epsilon = 1e-12);
        assert_relative_eq!(omega1, 10.0);
        assert_relative_eq!(omega2, -10.0);
    }

    #[test]
    fn zip_with_treats_missing_components_as_zero() {
        let double = State::double(1.0, 1.0, 1.0, 1.0);
        let single = State::single(2.0, 3.0);

        assert_eq!(double.zip_with(&single, |a, b| a + b), State::double(3.0, 4.0, 1.0, 1.0));
        assert_eq!(single.zip_with(&double, |a, b| a * b), State::single(2.0, 3.0));
    }
}
