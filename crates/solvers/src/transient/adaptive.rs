//! Adaptive sub-stepping.
//!
//! The sub-step bound shrinks as the pendulum spins faster:
//!
//! ```text
//! ω_max ≤ 0.1           →  max_dt
//! otherwise             →  max(1e-4, min(max_dt, base_dt / (1 + ω_max)))
//! ```
//!
//! A requested increment is then split into `ceil(|dt_total| / dt_max)`
//! *equal* sub-steps. Equal splitting keeps rounding error uniform across
//! the sub-steps and the result reproducible.
//!
//! The number of sub-steps is unbounded. Callers should clamp `dt_total`
//! (for example after a long pause) before integrating.

use pendel_core::{DerivativeModel, Params, State};

use super::Integrator;

/// Angular speed (rad/s) at or below which the system counts as at rest.
pub const REST_SPEED: f64 = 0.1;

/// Floor on the heuristic sub-step bound.
pub const MIN_STEP: f64 = 1e-4;

/// Result of integrating one requested increment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// State after all sub-steps.
    pub state: State,

    /// Number of sub-steps taken.
    pub substeps: usize,

    /// Size of each sub-step.
    pub substep_dt: f64,
}

/// Chooses a sub-step bound from the largest angular speed in `state`.
///
/// Returns `max_dt` unchanged when the system is nearly at rest, and a
/// bound scaled down by `1 + ω_max` otherwise, floored at [`MIN_STEP`].
#[must_use]
pub fn choose_dt_max(state: &State, base_dt: f64, max_dt: f64) -> f64 {
    let w_max = state.max_angular_speed();
    if w_max <= REST_SPEED {
        return max_dt;
    }
    let dt = max_dt.min(base_dt / (1.0 + w_max));
    dt.max(MIN_STEP)
}

/// Splits `dt_total` into equal sub-steps no longer than `dt_max`.
///
/// Returns `(count, size)`. The count is at least 1, so a zero increment
/// yields a single zero-length sub-step.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn substeps(dt_total: f64, dt_max: f64) -> (usize, f64) {
    let count = (dt_total.abs() / dt_max.max(1e-9)).ceil() as usize;
    let count = count.max(1);
    (count, dt_total / count as f64)
}

/// Integrates `dt_total` with `integrator`, sub-stepping at most `dt_max`.
#[must_use]
pub fn integrate<D>(
    integrator: Integrator,
    state: &State,
    dt_total: f64,
    dt_max: f64,
    params: &Params,
    model: &D,
) -> Solution
where
    D: DerivativeModel + ?Sized,
{
    let (count, dt) = substeps(dt_total, dt_max);

    let mut current = *state;
    for _ in 0..count {
        current = integrator.step(&current, dt, params, model);
    }

    Solution {
        state: current,
        substeps: count,
        substep_dt: dt,
    }
}
