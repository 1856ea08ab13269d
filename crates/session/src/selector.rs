//! Energy-driven integrator selection and step bound adaptation.
//!
//! After each energy check the selector decides between two actions:
//!
//! - Switch from symplectic Euler to RK4 when autoswitch is on and the drift
//!   exceeds the threshold. The switch is one-way, nothing switches back.
//! - Otherwise nudge `dt_max`: shrink it when the drift exceeds a fraction
//!   of the threshold, grow it slightly when it does not.
//!
//! The rule runs on every check for the life of a session, giving a
//! hysteresis loop around the threshold rather than a one-shot decision.

use log::{debug, info};
use pendel_core::Observer;
use pendel_solvers::transient::Integrator;
use thiserror::Error;

/// Tunable constants of the selection policy.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-derive", serde(default))]
pub struct Tuning {
    /// Multiplier applied to `dt_max` when the drift is too large.
    pub shrink_factor: f64,

    /// Multiplier applied to `dt_max` when the drift is acceptable.
    pub grow_factor: f64,

    /// Fraction of the threshold above which `dt_max` shrinks.
    pub shrink_trigger: f64,

    /// Lower bound for a shrunk `dt_max`.
    pub min_dt_max: f64,

    /// Upper bound for a grown `dt_max` under RK4.
    pub rk4_dt_max_limit: f64,

    /// Upper bound for a grown `dt_max` under symplectic Euler.
    pub symplectic_dt_max_limit: f64,

    /// `base_dt` restored on a switch to RK4.
    pub rk4_base_dt: f64,

    /// `dt_max` restored on a switch to RK4.
    pub rk4_dt_max: f64,

    /// Smallest heuristic base step used with symplectic Euler.
    pub symplectic_base_floor: f64,

    /// Scale from `base_dt` to the symplectic heuristic base step.
    pub symplectic_base_scale: f64,
}

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum TuningError {
    #[error("shrink_factor must lie in (0, 1), got {0}")]
    ShrinkFactor(f64),

    #[error("grow_factor must be finite and at least 1, got {0}")]
    GrowFactor(f64),

    #[error("{name} must be finite and positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            shrink_factor: 0.85,
            grow_factor: 1.05,
            shrink_trigger: 0.5,
            min_dt_max: 0.001,
            rk4_dt_max_limit: 0.015,
            symplectic_dt_max_limit: 0.03,
            rk4_base_dt: 0.004,
            rk4_dt_max: 0.015,
            symplectic_base_floor: 0.008,
            symplectic_base_scale: 2.0,
        }
    }
}

impl Tuning {
    /// Checks that every constant is usable.
    ///
    /// # Errors
    ///
    /// Returns the first offending constant.
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.shrink_factor > 0.0 && self.shrink_factor < 1.0) {
            return Err(TuningError::ShrinkFactor(self.shrink_factor));
        }
        if !self.grow_factor.is_finite() || self.grow_factor < 1.0 {
            return Err(TuningError::GrowFactor(self.grow_factor));
        }

        let positive = [
            ("shrink_trigger", self.shrink_trigger),
            ("min_dt_max", self.min_dt_max),
            ("rk4_dt_max_limit", self.rk4_dt_max_limit),
            ("symplectic_dt_max_limit", self.symplectic_dt_max_limit),
            ("rk4_base_dt", self.rk4_base_dt),
            ("rk4_dt_max", self.rk4_dt_max),
            ("symplectic_base_floor", self.symplectic_base_floor),
            ("symplectic_base_scale", self.symplectic_base_scale),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::NotPositive { name, value });
            }
        }

        Ok(())
    }

    /// Upper bound `dt_max` may grow to under `integrator`.
    #[must_use]
    pub fn dt_max_limit(&self, integrator: Integrator) -> f64 {
        match integrator {
            Integrator::Rk4 => self.rk4_dt_max_limit,
            Integrator::Symplectic => self.symplectic_dt_max_limit,
        }
    }

    /// Base step fed to the adaptive heuristic under `integrator`.
    ///
    /// Symplectic Euler is cheap per step, so it runs on a larger base.
    #[must_use]
    pub fn heuristic_base_dt(&self, integrator: Integrator, base_dt: f64) -> f64 {
        match integrator {
            Integrator::Rk4 => base_dt,
            Integrator::Symplectic => self
                .symplectic_base_floor
                .max(base_dt * self.symplectic_base_scale),
        }
    }
}

/// An energy check as seen by the selector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Check {
    pub drift: f64,
    pub integrator: Integrator,
    pub dt_max: f64,
    pub autoswitch: bool,
    pub threshold: f64,
}

/// What the session should change after a check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Switch to RK4 and restore its step parameters.
    SwitchToRk4 { base_dt: f64, dt_max: f64 },

    /// Replace `dt_max`.
    SetDtMax(f64),
}

/// The selection policy, driven as an [`Observer`] of energy checks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegratorSelector {
    tuning: Tuning,
    switches: usize,
}

impl IntegratorSelector {
    #[must_use]
    pub fn new(tuning: Tuning) -> Self {
        Self {
            tuning,
            switches: 0,
        }
    }

    #[must_use]
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Number of automatic switches made so far.
    #[must_use]
    pub fn switches(&self) -> usize {
        self.switches
    }
}

impl Observer<Check, Action> for IntegratorSelector {
    fn observe(&mut self, check: &Check) -> Option<Action> {
        let t = &self.tuning;

        if check.autoswitch
            && check.integrator == Integrator::Symplectic
            && check.drift > check.threshold
        {
            self.switches += 1;
            info!(
                "energy drift {:.3}% exceeds {:.3}%, switching to rk4",
                check.drift * 100.0,
                check.threshold * 100.0
            );
            return Some(Action::SwitchToRk4 {
                base_dt: t.rk4_base_dt,
                dt_max: t.rk4_dt_max,
            });
        }

        let dt_max = if check.drift > check.threshold * t.shrink_trigger {
            (check.dt_max * t.shrink_factor).max(t.min_dt_max)
        } else {
            (check.dt_max * t.grow_factor).min(t.dt_max_limit(check.integrator))
        };
        debug!(
            "dt_max {:.5} -> {dt_max:.5} at drift {:.4}%",
            check.dt_max,
            check.drift * 100.0
        );

        Some(Action::SetDtMax(dt_max))
    }
}
