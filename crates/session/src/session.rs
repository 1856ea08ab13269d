use log::{debug, trace, warn};
use pendel_core::{
    Mode, Observer, Params, PositionError, Positions, State, StateError, dynamics, positions,
};
use pendel_solvers::transient::{Integrator, adaptive};

use crate::{
    Action, Check, ConfigError, EnergyMonitor, IntegratorSelector, SessionConfig, Trail,
};

/// Largest sub-step used by [`Session::predict`].
const PREDICT_STEP: f64 = 0.005;

/// A running pendulum simulation.
///
/// The session exclusively owns the state, the trail and the integrator
/// control loop. Callers decide when to call [`step`](Self::step); nothing
/// runs in the background. Concurrent use must be serialized by the caller,
/// for example by wrapping the whole session in a mutex.
///
/// The public fields are plain data read at the next step. They are not
/// validated here, see [`SessionConfig::validate`] for the checks applied
/// at construction.
#[derive(Debug, Clone)]
pub struct Session {
    pub params: Params,
    pub integrator: Integrator,
    pub base_dt: f64,
    pub dt_max: f64,
    pub time_scale: f64,
    pub autoswitch: bool,
    pub energy_threshold: f64,
    pub energy_check_interval: f64,
    pub normalize_every_n: usize,
    pub trail_enabled: bool,
    pub trail_max_points: usize,
    pub max_frame_dt: f64,
    pub stop_at: Option<f64>,

    mode: Mode,
    state: State,
    sim_time: f64,
    steps_since_normalize: usize,
    monitor: EnergyMonitor,
    selector: IntegratorSelector,
    trail: Trail,
}

/// A serializable snapshot of session state and diagnostics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-derive", derive(serde::Serialize, serde::Deserialize))]
pub struct Metrics {
    pub mode: Mode,
    pub state: State,
    pub params: Params,
    pub integrator: Integrator,
    pub dt_max: f64,
    pub base_dt: f64,
    pub sim_time: f64,
    pub energy_drift: f64,
    pub energy_reference: Option<f64>,
    pub trail_len: usize,
    pub switches: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_config(SessionConfig::default())
    }
}

impl Session {
    /// Creates a session with default settings: a double pendulum at its
    /// canonical starting angles, integrated with RK4.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration fails
    /// [`SessionConfig::validate`].
    pub fn from_config(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: SessionConfig) -> Self {
        Self {
            params: config.params,
            integrator: config.integrator,
            base_dt: config.base_dt,
            dt_max: config.dt_max,
            time_scale: config.time_scale,
            autoswitch: config.autoswitch,
            energy_threshold: config.energy_threshold,
            energy_check_interval: config.energy_check_interval,
            normalize_every_n: config.normalize_every_n,
            trail_enabled: config.trail_enabled,
            trail_max_points: config.trail_max_points,
            max_frame_dt: config.max_frame_dt,
            stop_at: config.stop_at,
            mode: config.mode,
            state: State::initial(config.mode),
            sim_time: 0.0,
            steps_since_normalize: 0,
            monitor: EnergyMonitor::new(),
            selector: IntegratorSelector::new(config.tuning),
            trail: Trail::new(),
        }
    }

    /// Advances the simulation by `dt` seconds of simulated time.
    ///
    /// The increment is split into equal sub-steps bounded by the adaptive
    /// heuristic and `dt_max`. Afterwards angles are wrapped (every
    /// `normalize_every_n` steps), the energy control loop runs if the
    /// system is undamped, and the tracked bob is appended to the trail.
    ///
    /// The number of sub-steps grows linearly with `dt`, clamp large
    /// increments first or use [`advance_frame`](Self::advance_frame).
    pub fn step(&mut self, dt: f64) {
        let base_dt = self
            .selector
            .tuning()
            .heuristic_base_dt(self.integrator, self.base_dt);
        let bound = self
            .dt_max
            .min(adaptive::choose_dt_max(&self.state, base_dt, self.dt_max));

        let solution = adaptive::integrate(
            self.integrator,
            &self.state,
            dt,
            bound,
            &self.params,
            &dynamics::derivative,
        );
        self.state = solution.state;

        self.steps_since_normalize += 1;
        if self.steps_since_normalize >= self.normalize_every_n.max(1) {
            self.state = self.state.normalized();
            self.steps_since_normalize = 0;
        }

        self.sim_time += dt;

        if dynamics::is_near_singular(&self.state, &self.params) {
            trace!("near-singular configuration at t={:.3}", self.sim_time);
        }

        if self.params.is_undamped() {
            self.control_energy(dt);
        } else {
            self.monitor.end_epoch();
        }

        if self.trail_enabled {
            self.record_trail();
        }
    }

    /// Advances by a wall-clock delta, as a render loop would.
    ///
    /// The delta is clamped to `[0, max_frame_dt]` and scaled by
    /// `time_scale`. Once `sim_time` reaches `stop_at` frames do nothing,
    /// and the frame that crosses it is shortened to land on it exactly.
    ///
    /// Returns the simulated time advanced.
    pub fn advance_frame(&mut self, real_dt: f64) -> f64 {
        if self.is_finished() {
            return 0.0;
        }

        let mut dt = real_dt.max(0.0).min(self.max_frame_dt) * self.time_scale;
        let mut landing = None;
        if let Some(stop_at) = self.stop_at.filter(|&t| self.sim_time + dt >= t) {
            dt = stop_at - self.sim_time;
            landing = Some(stop_at);
        }
        if dt.is_nan() || dt <= 0.0 {
            return 0.0;
        }

        self.step(dt);
        if let Some(stop_at) = landing {
            self.sim_time = stop_at;
        }
        dt
    }

    /// Restores the canonical starting angles for the current mode and
    /// clears time, trail and energy tracking.
    pub fn reset(&mut self) {
        self.state = State::initial(self.mode);
        self.restart();
        debug!("session reset in {} mode", self.mode);
    }

    /// Switches between single and double pendulum.
    ///
    /// Does nothing if the mode is unchanged. Otherwise the first segment's
    /// angle and velocity carry over, a new second segment starts at a small
    /// nonzero angle at rest, and time, trail and energy tracking restart.
    ///
    /// Unlike [`reset`](Self::reset), this does not restore the canonical
    /// starting angles. Call `reset` afterwards for a fresh start.
    pub fn set_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }
        self.state = self.state.into_mode(mode);
        self.mode = mode;
        self.restart();
        debug!("switched to {mode} mode");
    }

    /// Places the pendulum at `state`, as when a user drags a bob.
    ///
    /// Starts a new energy epoch. The trail is kept.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::ModeMismatch`] if `state` does not match the
    /// session's mode.
    pub fn set_state(&mut self, state: State) -> Result<(), StateError> {
        if state.mode() != self.mode {
            return Err(StateError::ModeMismatch {
                expected: self.mode,
                found: state.mode(),
            });
        }
        self.state = state;
        self.monitor.reset();
        Ok(())
    }

    /// Empties the trail. The simulation itself is unaffected.
    pub fn clear_trail(&mut self) {
        self.trail.clear();
    }

    /// Bob positions in meters relative to the hinge.
    ///
    /// # Errors
    ///
    /// Returns a [`PositionError`] if the state or lengths are degenerate
    /// enough to produce non-finite coordinates.
    pub fn positions(&self) -> Result<Positions, PositionError> {
        positions(&self.state, &self.params)
    }

    /// State reached `t` seconds after a reset, with the current parameters.
    ///
    /// Integrates a fresh copy of the canonical starting state with RK4.
    /// The session itself is not touched.
    #[must_use]
    pub fn predict(&self, t: f64) -> State {
        adaptive::integrate(
            Integrator::Rk4,
            &State::initial(self.mode),
            t,
            PREDICT_STEP,
            &self.params,
            &dynamics::derivative,
        )
        .state
    }

    /// Bob positions reached `t` seconds after a reset.
    ///
    /// # Errors
    ///
    /// Returns a [`PositionError`] for non-finite coordinates.
    pub fn predict_positions(&self, t: f64) -> Result<Positions, PositionError> {
        positions(&self.predict(t), &self.params)
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn state(&self) -> &State {
        &self.state
    }

    #[must_use]
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    /// Relative energy drift reported by the last check.
    #[must_use]
    pub fn energy_drift(&self) -> f64 {
        self.monitor.drift()
    }

    /// Reference energy of the current epoch, if one is held.
    #[must_use]
    pub fn energy_reference(&self) -> Option<f64> {
        self.monitor.reference().map(|r| r.energy)
    }

    #[must_use]
    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    #[must_use]
    pub fn selector(&self) -> &IntegratorSelector {
        &self.selector
    }

    /// Returns `true` once `sim_time` has reached `stop_at`.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.stop_at.is_some_and(|t| self.sim_time >= t)
    }

    #[must_use]
    pub fn metrics(&self) -> Metrics {
        Metrics {
            mode: self.mode,
            state: self.state,
            params: self.params,
            integrator: self.integrator,
            dt_max: self.dt_max,
            base_dt: self.base_dt,
            sim_time: self.sim_time,
            energy_drift: self.energy_drift(),
            energy_reference: self.energy_reference(),
            trail_len: self.trail.len(),
            switches: self.selector.switches(),
        }
    }

    fn restart(&mut self) {
        self.sim_time = 0.0;
        self.steps_since_normalize = 0;
        self.monitor.reset();
        self.trail.clear();
    }

    fn control_energy(&mut self, dt: f64) {
        let Some(measurement) = self.monitor.track(
            &self.state,
            &self.params,
            self.integrator,
            dt,
            self.energy_check_interval,
        ) else {
            return;
        };

        let check = Check {
            drift: measurement.drift,
            integrator: self.integrator,
            dt_max: self.dt_max,
            autoswitch: self.autoswitch,
            threshold: self.energy_threshold,
        };

        match self.selector.observe(&check) {
            Some(Action::SwitchToRk4 { base_dt, dt_max }) => {
                self.integrator = Integrator::Rk4;
                self.base_dt = base_dt;
                self.dt_max = dt_max;
                self.monitor.rebase(measurement.energy, Integrator::Rk4);
            }
            Some(Action::SetDtMax(dt_max)) => self.dt_max = dt_max,
            None => {}
        }
    }

    fn record_trail(&mut self) {
        match self.positions() {
            Ok(p) => self.trail.push(p.tip(), self.trail_max_points),
            Err(err) => warn!("trail sample skipped: {err}"),
        }
    }
}
