//! Energy conservation tracking.
//!
//! The monitor keeps a reference energy per integration epoch and reports
//! the relative drift from it at a fixed interval of simulated time. An
//! epoch starts on the first undamped step after a reset, after damping
//! was active, or after the active integrator changed.

use log::warn;
use pendel_core::{Params, State, relative_drift, total_energy};
use pendel_solvers::transient::Integrator;

/// Reference energy captured at the start of an epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reference {
    pub energy: f64,
    pub integrator: Integrator,
}

/// Outcome of one periodic energy check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    /// Energy at the check, `None` if it could not be evaluated.
    pub energy: Option<f64>,

    /// Relative drift from the reference. Zero when evaluation failed.
    pub drift: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnergyMonitor {
    reference: Option<Reference>,
    accumulated: f64,
    drift: f64,
}

impl EnergyMonitor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an undamped step of `dt` seconds.
    ///
    /// Captures a reference if none is held for `integrator`. Once at least
    /// `interval` seconds have accumulated, the accumulator is zeroed and a
    /// [`Measurement`] is returned.
    pub fn track(
        &mut self,
        state: &State,
        params: &Params,
        integrator: Integrator,
        dt: f64,
        interval: f64,
    ) -> Option<Measurement> {
        if self.reference.is_none_or(|r| r.integrator != integrator) {
            self.capture(state, params, integrator);
        }

        self.accumulated += dt;
        if self.accumulated < interval {
            return None;
        }
        self.accumulated = 0.0;

        let measurement = match total_energy(state, params) {
            Ok(energy) => {
                let reference = self.reference.map_or(energy, |r| r.energy);
                Measurement {
                    energy: Some(energy),
                    drift: relative_drift(energy, reference),
                }
            }
            Err(err) => {
                warn!("energy check skipped: {err}");
                Measurement {
                    energy: None,
                    drift: 0.0,
                }
            }
        };

        self.drift = measurement.drift;
        Some(measurement)
    }

    /// Replaces the reference, starting a new epoch for `integrator`.
    ///
    /// Passing `None` drops the reference so the next tracked step captures
    /// a fresh one.
    pub fn rebase(&mut self, energy: Option<f64>, integrator: Integrator) {
        self.reference = energy.map(|energy| Reference { energy, integrator });
    }

    /// Ends the current epoch without touching the last reported drift.
    pub fn end_epoch(&mut self) {
        self.reference = None;
        self.accumulated = 0.0;
    }

    /// Forgets the reference, the accumulator and the drift.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Most recently reported relative drift.
    #[must_use]
    pub fn drift(&self) -> f64 {
        self.drift
    }

    #[must_use]
    pub fn reference(&self) -> Option<Reference> {
        self.reference
    }

    fn capture(&mut self, state: &State, params: &Params, integrator: Integrator) {
        match total_energy(state, params) {
            Ok(energy) => self.rebase(Some(energy), integrator),
            Err(err) => {
                warn!("energy reference not captured: {err}");
                self.reference = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    const INTERVAL: f64 = 0.5;

    fn track(monitor: &mut EnergyMonitor, state: &State, dt: f64) -> Option<Measurement> {
        monitor.track(state, &Params::default(), Integrator::Rk4, dt, INTERVAL)
    }

    #[test]
    fn first_track_captures_reference() {
        let mut monitor = EnergyMonitor::new();
        let state = State::single(0.0, 0.0);

        assert!(track(&mut monitor, &state, 0.1).is_none());

        let reference = monitor.reference().unwrap();
        assert_relative_eq!(reference.energy, -9.81, epsilon = 1e-12);
        assert_eq!(reference.integrator, Integrator::Rk4);
    }

    #[test]
    fn checks_fire_every_interval() {
        let mut monitor = EnergyMonitor::new();
        let state = State::single(0.0, 0.0);

        let fired: Vec<bool> = (0..12)
            .map(|_| track(&mut monitor, &state, 0.125).is_some())
            .collect();

        let expected = [false, false, false, true];
        let expected: Vec<bool> = expected.iter().cycle().take(12).copied().collect();
        assert_eq!(fired, expected);
    }

    #[test]
    fn drift_is_relative_to_reference() {
        let mut monitor = EnergyMonitor::new();
        // E = -9.81 at rest, then a state with E = -9.81 + 0.5·ω².
        track(&mut monitor, &State::single(0.0, 0.0), 0.1);
        let m = track(&mut monitor, &State::single(0.0, 1.0), 0.5).unwrap();

        assert_relative_eq!(m.energy.unwrap(), -9.31, epsilon = 1e-12);
        assert_relative_eq!(m.drift, 0.5 / 9.81, epsilon = 1e-12);
        assert_relative_eq!(monitor.drift(), 0.5 / 9.81, epsilon = 1e-12);
    }

    #[test]
    fn integrator_change_recaptures() {
        let mut monitor = EnergyMonitor::new();
        let params = Params::default();

        monitor.track(&State::single(0.0, 0.0), &params, Integrator::Rk4, 0.1, INTERVAL);
        monitor.track(&State::single(0.0, 1.0), &params, Integrator::Symplectic, 0.1, INTERVAL);

        let reference = monitor.reference().unwrap();
        assert_eq!(reference.integrator, Integrator::Symplectic);
        assert_relative_eq!(reference.energy, -9.31, epsilon = 1e-12);
    }

    #[test]
    fn failed_evaluation_reports_zero_drift() {
        let mut monitor = EnergyMonitor::new();
        let params = Params::default();
        track(&mut monitor, &State::single(0.0, 0.0), 0.1);

        let m = monitor
            .track(&State::single(f64::NAN, 0.0), &params, Integrator::Rk4, 1.0, INTERVAL)
            .unwrap();

        assert_eq!(m.energy, None);
        assert_eq!(m.drift, 0.0);
    }

    #[test]
    fn end_epoch_keeps_drift() {
        let mut monitor = EnergyMonitor::new();
        track(&mut monitor, &State::single(0.0, 0.0), 0.1);
        track(&mut monitor, &State::single(0.0, 1.0), 0.5);

        monitor.end_epoch();

        assert!(monitor.reference().is_none());
        assert!(monitor.drift() > 0.0);

        monitor.reset();
        assert_eq!(monitor.drift(), 0.0);
    }
}
