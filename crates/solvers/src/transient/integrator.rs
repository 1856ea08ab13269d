use std::{fmt, str::FromStr};

use pendel_core::{DerivativeModel, Params, State};
use thiserror::Error;

use super::{rk4, symplectic_euler};

/// The step scheme used to advance a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-derive", serde(rename_all = "lowercase"))]
pub enum Integrator {
    /// Classical fourth-order Runge–Kutta. Accurate, four evaluations per step.
    #[default]
    Rk4,

    /// Semi-implicit Euler. One evaluation per step, bounded energy error.
    Symplectic,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown integrator {0:?}, expected \"rk4\" or \"symplectic\"")]
pub struct ParseIntegratorError(String);

impl Integrator {
    /// Advances `state` by one step of size `dt`.
    #[must_use]
    pub fn step<D>(self, state: &State, dt: f64, params: &Params, model: &D) -> State
    where
        D: DerivativeModel + ?Sized,
    {
        match self {
            Self::Rk4 => rk4::step(state, dt, params, model),
            Self::Symplectic => symplectic_euler::step(state, dt, params, model),
        }
    }

    /// Number of derivative evaluations per step.
    #[must_use]
    pub fn evaluations_per_step(self) -> usize {
        match self {
            Self::Rk4 => 4,
            Self::Symplectic => 1,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rk4 => "rk4",
            Self::Symplectic => "symplectic",
        }
    }
}

impl fmt::Display for Integrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Integrator {
    type Err = ParseIntegratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rk4" => Ok(Self::Rk4),
            "symplectic" | "symplectic-euler" => Ok(Self::Symplectic),
            _ => Err(ParseIntegratorError(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pendel_core::dynamics;

    #[test]
    fn parses_names() {
        assert_eq!("rk4".parse(), Ok(Integrator::Rk4));
        assert_eq!("RK4".parse(), Ok(Integrator::Rk4));
        assert_eq!("symplectic".parse(), Ok(Integrator::Symplectic));
        assert_eq!("symplectic-euler".parse(), Ok(Integrator::Symplectic));
        assert!("verlet".parse::<Integrator>().is_err());
        assert_eq!(Integrator::Symplectic.to_string(), "symplectic");
    }

    #[test]
    fn dispatches_to_scheme() {
        let params = Params::default();
        let start = State::initial(pendel_core::Mode::Double);

        assert_eq!(
            Integrator::Rk4.step(&start, 0.01, &params, &dynamics::derivative),
            rk4::step(&start, 0.01, &params, &dynamics::derivative),
        );
        assert_eq!(
            Integrator::Symplectic.step(&start, 0.01, &params, &dynamics::derivative),
            symplectic_euler::step(&start, 0.01, &params, &dynamics::derivative),
        );
    }

    #[test]
    fn counts_model_evaluations() {
        use std::cell::Cell;

        for integrator in [Integrator::Rk4, Integrator::Symplectic] {
            let calls = Cell::new(0);
            let counting = |s: &State, p: &Params| {
                calls.set(calls.get() + 1);
                dynamics::derivative(s, p)
            };

            let _ = integrator.step(&State::single(0.5, 0.0), 0.01, &Params::default(), &counting);

            assert_eq!(calls.get(), integrator.evaluations_per_step());
        }
    }
}
