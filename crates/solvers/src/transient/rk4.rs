//! Classical fourth-order Runge–Kutta.
//!
//! ```text
//! k1 = f(s)
//! k2 = f(s + dt/2 · k1)
//! k3 = f(s + dt/2 · k2)
//! k4 = f(s + dt · k3)
//! s' = s + dt · (k1 + 2·k2 + 2·k3 + k4) / 6
//! ```

use pendel_core::{DerivativeModel, Params, State, StepIntegrable};

/// Advances `state` by `dt` with one RK4 step.
///
/// Evaluates the model four times. Output depends only on the arguments.
#[must_use]
pub fn step<D>(state: &State, dt: f64, params: &Params, model: &D) -> State
where
    D: DerivativeModel + ?Sized,
{
    let k1 = model.derivative(state, params);
    let k2 = model.derivative(&state.step(k1, 0.5 * dt), params);
    let k3 = model.derivative(&state.step(k2, 0.5 * dt), params);
    let k4 = model.derivative(&state.step(k3, dt), params);

    let slope = k1
        .zip_with(&k2, |a, b| a + 2.0 * b)
        .zip_with(&k3, |a, b| a + 2.0 * b)
        .zip_with(&k4, |a, b| a + b);

    state.zip_with(&slope, |s, k| s + dt * k / 6.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use pendel_core::dynamics;

    /// Unit harmonic oscillator: θ'' = -θ, exact solution θ = cos t.
    fn oscillator(state: &State, _params: &Params) -> State {
        let (theta, omega) = state.first();
        State::single(omega, -theta)
    }

    fn run(dt: f64, steps: usize) -> State {
        let mut s = State::single(1.0, 0.0);
        for _ in 0..steps {
            s = step(&s, dt, &Params::default(), &oscillator);
        }
        s
    }

    #[test]
    fn matches_closed_form_oscillator() {
        let s = run(0.01, 100);
        let (theta, omega) = s.first();

        assert_abs_diff_eq!(theta, 1f64.cos(), epsilon = 1e-9);
        assert_abs_diff_eq!(omega, -(1f64.sin()), epsilon = 1e-9);
    }

    #[test]
    fn halving_the_step_cuts_error_by_about_sixteen() {
        let error = |dt: f64, steps: usize| (run(dt, steps).first().0 - 1f64.cos()).abs();

        let coarse = error(0.1, 10);
        let fine = error(0.05, 20);
        let ratio = coarse / fine;

        assert!(ratio > 12.0 && ratio < 20.0, "ratio was {ratio}");
    }

    #[test]
    fn single_step_error_shrinks_as_fifth_power() {
        // One step of dt against two steps of dt/2: the difference is the
        // local error, which scales as dt^5.
        let params = Params::default();
        let start = State::double(1.2, 0.0, -0.4, 0.5);
        let local_error = |dt: f64| {
            let whole = step(&start, dt, &params, &dynamics::derivative);
            let half = step(&start, 0.5 * dt, &params, &dynamics::derivative);
            let halves = step(&half, 0.5 * dt, &params, &dynamics::derivative);
            whole
                .zip_with(&halves, |a, b| (a - b).abs())
                .as_slice()
                .iter()
                .copied()
                .fold(0.0, f64::max)
        };

        let ratio = local_error(0.02) / local_error(0.01);
        assert!(ratio > 16.0, "ratio was {ratio}");
    }

    #[test]
    fn output_is_bit_reproducible() {
        let params = Params::default();
        let start = State::initial(pendel_core::Mode::Double);

        let a = step(&start, 0.013, &params, &dynamics::derivative);
        let b = step(&start, 0.013, &params, &dynamics::derivative);

        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn zero_step_returns_state() {
        let start = State::single(0.7, -0.3);
        let next = step(&start, 0.0, &Params::default(), &dynamics::derivative);
        assert_relative_eq!(next.first().0, 0.7);
        assert_relative_eq!(next.first().1, -0.3);
    }
}
