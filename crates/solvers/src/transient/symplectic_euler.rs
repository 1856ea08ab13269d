//! Semi-implicit (symplectic) Euler.
//!
//! Each segment's angular velocity is updated from the angular acceleration
//! first, then its angle is updated with the *new* velocity:
//!
//! ```text
//! ω' = ω + dt · α(θ, ω)
//! θ' = θ + dt · ω'
//! ```
//!
//! The update order is what makes the scheme symplectic. Reversing it gives
//! explicit Euler, whose energy grows without bound on an undamped pendulum.

use pendel_core::{DerivativeModel, Params, State};

/// Advances `state` by `dt` with one symplectic Euler step.
///
/// Evaluates the model once, at the start of the step.
#[must_use]
pub fn step<D>(state: &State, dt: f64, params: &Params, model: &D) -> State
where
    D: DerivativeModel + ?Sized,
{
    let rates = model.derivative(state, params);
    let rates = rates.as_slice();
    let alpha = |i: usize| rates.get(i).copied().unwrap_or(0.0);

    match *state {
        State::Single([theta, omega]) => {
            let omega = omega + dt * alpha(1);
            State::single(theta + dt * omega, omega)
        }
        State::Double([theta1, omega1, theta2, omega2]) => {
            let omega1 = omega1 + dt * alpha(1);
            let omega2 = omega2 + dt * alpha(3);
            State::double(theta1 + dt * omega1, omega1, theta2 + dt * omega2, omega2)
        }
    }
}
