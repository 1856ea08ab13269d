//! Equations of motion for the single and double pendulum.
//!
//! Both models are pure functions of `(state, params)` and return the time
//! derivative of the state in the same shape. Angles are measured from the
//! downward vertical and damping is a linear drag on each angular velocity.

use crate::{Params, State};

/// Smallest magnitude allowed for the double pendulum denominator.
pub const DENOMINATOR_FLOOR: f64 = 1e-9;

/// A function computing the time derivative of a state.
///
/// Implemented for any `Fn(&State, &Params) -> State`, so plain functions
/// such as [`derivative`] and closures can be handed to the integrators.
pub trait DerivativeModel {
    /// Returns `d(state)/dt` for the given parameters.
    fn derivative(&self, state: &State, params: &Params) -> State;
}

impl<F> DerivativeModel for F
where
    F: Fn(&State, &Params) -> State,
{
    fn derivative(&self, state: &State, params: &Params) -> State {
        self(state, params)
    }
}

/// Derivative of any state, dispatching on its shape.
#[must_use]
pub fn derivative(state: &State, params: &Params) -> State {
    match state {
        State::Single(s) => State::Single(single_pendulum(s, params)),
        State::Double(s) => State::Double(double_pendulum(s, params)),
    }
}

/// Derivative `[dθ, dω]` of a single pendulum state `[θ, ω]`.
///
/// Uses `l1` as the rod length. The length is floored at
/// [`DENOMINATOR_FLOOR`] so a zero length does not divide by zero.
#[must_use]
pub fn single_pendulum(state: &[f64; 2], params: &Params) -> [f64; 2] {
    let [theta, omega] = *state;
    let length = params.l1.max(DENOMINATOR_FLOOR);

    let alpha = -(params.g / length) * theta.sin() - params.damping * omega;
    [omega, alpha]
}

/// Derivative `[ω1, α1, ω2, α2]` of a double pendulum state `[θ1, ω1, θ2, ω2]`.
#[must_use]
pub fn double_pendulum(state: &[f64; 4], params: &Params) -> [f64; 4] {
    let [theta1, omega1, theta2, omega2] = *state;
    let Params {
        m1,
        m2,
        l1,
        l2,
        g,
        damping,
    } = *params;

    let delta = theta1 - theta2;
    let (sin_delta, cos_delta) = delta.sin_cos();
    let denom = clamp_denominator(denominator(delta, m1, m2));

    let num1 = -g * (2.0 * m1 + m2) * theta1.sin()
        - m2 * g * (theta1 - 2.0 * theta2).sin()
        - 2.0 * sin_delta * m2 * (omega2 * omega2 * l2 + omega1 * omega1 * l1 * cos_delta);
    let alpha1 = num1 / (l1 * denom) - damping * omega1;

    let num2 = 2.0
        * sin_delta
        * (omega1 * omega1 * l1 * (m1 + m2)
            + g * (m1 + m2) * theta1.cos()
            + omega2 * omega2 * l2 * m2 * cos_delta);
    let alpha2 = num2 / (l2 * denom) - damping * omega2;

    [omega1, alpha1, omega2, alpha2]
}

/// Returns `true` if the double pendulum denominator is being clamped.
///
/// Always `false` for a single pendulum state.
#[must_use]
pub fn is_near_singular(state: &State, params: &Params) -> bool {
    match state {
        State::Single(_) => false,
        State::Double([theta1, _, theta2, _]) => {
            denominator(theta1 - theta2, params.m1, params.m2).abs() < DENOMINATOR_FLOOR
        }
    }
}

fn denominator(delta: f64, m1: f64, m2: f64) -> f64 {
    2.0 * m1 + m2 - m2 * (2.0 * delta).cos()
}

fn clamp_denominator(denom: f64) -> f64 {
    if denom.abs() < DENOMINATOR_FLOOR {
        DENOMINATOR_FLOOR
    } else {
        denom
    }
}
