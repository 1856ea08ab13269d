//! Real-time pendulum simulation sessions.
//!
//! A [`Session`] owns the pendulum state and advances it on request. Each
//! [`Session::step`] sub-steps the active integrator, wraps angles, runs the
//! energy control loop and records the trail:
//!
//! - [`EnergyMonitor`]: tracks the relative energy drift of undamped runs
//! - [`IntegratorSelector`]: switches symplectic Euler to RK4 on excessive
//!   drift and adapts `dt_max` otherwise
//! - [`Trail`]: bounded history of the outer bob's positions
//! - [`SessionConfig`]: every tunable, serializable with `serde-derive`
//!
//! Logging goes through the [`log`] facade.

mod config;
mod monitor;
mod selector;
mod session;
mod trail;

pub use config::{ConfigError, SessionConfig};
pub use monitor::{EnergyMonitor, Measurement, Reference};
pub use selector::{Action, Check, IntegratorSelector, Tuning, TuningError};
pub use session::{Metrics, Session};
pub use trail::Trail;
