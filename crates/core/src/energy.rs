use thiserror::Error;

use crate::{Params, State};

/// Error returned when the mechanical energy cannot be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum EnergyError {
    #[error("total energy is not finite ({0})")]
    NonFinite(f64),
}

/// Total mechanical energy (kinetic + potential) in joules.
///
/// Bob velocities come from the Cartesian derivatives of the bob positions.
/// Potential energy uses the bob height relative to the hinge, so a bob
/// hanging straight down sits at `-l` and has negative potential energy.
///
/// In single mode only `m1` and `l1` are used.
///
/// # Errors
///
/// Returns [`EnergyError::NonFinite`] when degenerate parameters or state
/// values make the result `NaN` or infinite.
pub fn total_energy(state: &State, params: &Params) -> Result<f64, EnergyError> {
    let energy = match *state {
        State::Single([theta, omega]) => {
            let Params { m1, l1, g, .. } = *params;
            let (vx, vy) = segment_velocity(l1, theta, omega);
            let kinetic = 0.5 * m1 * (vx * vx + vy * vy);
            let potential = m1 * g * -l1 * theta.cos();
            kinetic + potential
        }
        State::Double([theta1, omega1, theta2, omega2]) => {
            let Params {
                m1, m2, l1, l2, g, ..
            } = *params;
            let (vx1, vy1) = segment_velocity(l1, theta1, omega1);
            let (dvx2, dvy2) = segment_velocity(l2, theta2, omega2);
            let (vx2, vy2) = (vx1 + dvx2, vy1 + dvy2);

            let kinetic = 0.5 * m1 * (vx1 * vx1 + vy1 * vy1) + 0.5 * m2 * (vx2 * vx2 + vy2 * vy2);

            let h1 = -l1 * theta1.cos();
            let h2 = h1 - l2 * theta2.cos();
            let potential = m1 * g * h1 + m2 * g * h2;

            kinetic + potential
        }
    };

    if energy.is_finite() {
        Ok(energy)
    } else {
        Err(EnergyError::NonFinite(energy))
    }
}

/// Relative deviation `|current - reference| / max(1e-9, |reference|)`.
#[must_use]
pub fn relative_drift(current: f64, reference: f64) -> f64 {
    (current - reference).abs() / reference.abs().max(1e-9)
}

fn segment_velocity(length: f64, theta: f64, omega: f64) -> (f64, f64) {
    let (sin, cos) = theta.sin_cos();
    (length * omega * cos, -length * omega * sin)
}
