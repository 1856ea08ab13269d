//! Shared helpers for the integration tests.

use pendel_core::{Params, State, total_energy};
use pendel_session::Session;

/// Steps `session` in fixed increments of `dt` until `seconds` have passed.
///
/// Returns the largest relative energy deviation from the starting energy
/// seen along the way.
pub fn run_tracking_drift(session: &mut Session, seconds: f64, dt: f64) -> f64 {
    let e0 = energy(session.state(), &session.params);
    let mut worst: f64 = 0.0;

    let mut elapsed = 0.0;
    while elapsed < seconds {
        session.step(dt);
        elapsed += dt;
        let e = energy(session.state(), &session.params);
        worst = worst.max((e - e0).abs() / e0.abs().max(1e-9));
    }

    worst
}

/// Total energy, panicking on degenerate input.
pub fn energy(state: &State, params: &Params) -> f64 {
    total_energy(state, params).expect("energy should be finite")
}
