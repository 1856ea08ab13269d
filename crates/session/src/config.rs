use pendel_core::{Mode, Params};
use pendel_solvers::transient::Integrator;
use thiserror::Error;

use crate::TuningError;

/// Everything needed to start a [`Session`](crate::Session).
///
/// With the `serde-derive` feature every field is optional in a serialized
/// document; missing fields take their default.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-derive", serde(default))]
pub struct SessionConfig {
    pub mode: Mode,
    pub params: Params,
    pub integrator: Integrator,

    /// Base step of the adaptive heuristic, in seconds.
    pub base_dt: f64,

    /// Ceiling on the sub-step size, in seconds.
    pub dt_max: f64,

    /// Simulated seconds per wall-clock second in [`Session::advance_frame`].
    ///
    /// [`Session::advance_frame`]: crate::Session::advance_frame
    pub time_scale: f64,

    pub autoswitch: bool,

    /// Relative energy drift that triggers a switch to RK4.
    pub energy_threshold: f64,

    /// Simulated seconds between energy checks.
    pub energy_check_interval: f64,

    /// Angles are wrapped every this many steps.
    pub normalize_every_n: usize,

    pub trail_enabled: bool,
    pub trail_max_points: usize,

    /// Longest wall-clock delta accepted by a single frame.
    pub max_frame_dt: f64,

    /// Simulated time at which frames stop advancing.
    pub stop_at: Option<f64>,

    pub tuning: crate::Tuning,
}

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be finite and positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("normalize_every_n must be at least 1")]
    NormalizeEvery,

    #[error("invalid tuning: {0}")]
    Tuning(#[from] TuningError),
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Double,
            params: Params::default(),
            integrator: Integrator::Rk4,
            base_dt: 0.004,
            dt_max: 0.015,
            time_scale: 1.0,
            autoswitch: true,
            energy_threshold: 0.1,
            energy_check_interval: 0.5,
            normalize_every_n: 1,
            trail_enabled: true,
            trail_max_points: 300,
            max_frame_dt: 0.05,
            stop_at: None,
            tuning: crate::Tuning::default(),
        }
    }
}

impl SessionConfig {
    /// Checks the configuration before a session is built from it.
    ///
    /// Physical parameters must keep the equations of motion well defined:
    /// positive masses and lengths, finite gravity, non-negative damping.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.params;
        let positive = [
            ("params.m1", p.m1),
            ("params.m2", p.m2),
            ("params.l1", p.l1),
            ("params.l2", p.l2),
            ("base_dt", self.base_dt),
            ("dt_max", self.dt_max),
            ("energy_check_interval", self.energy_check_interval),
            ("max_frame_dt", self.max_frame_dt),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        let mut non_negative = vec![
            ("params.g", p.g),
            ("params.damping", p.damping),
            ("time_scale", self.time_scale),
            ("energy_threshold", self.energy_threshold),
        ];
        if let Some(stop_at) = self.stop_at {
            non_negative.push(("stop_at", stop_at));
        }
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { name, value });
            }
        }

        if self.normalize_every_n == 0 {
            return Err(ConfigError::NormalizeEvery);
        }

        self.tuning.validate()?;
        Ok(())
    }
}
