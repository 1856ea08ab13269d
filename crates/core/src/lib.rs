//! Core types and traits for pendulum simulation.
//!
//! This crate defines the pieces the integrators and the session build on:
//!
//! - [`State`]: angular state of a single or double pendulum
//! - [`Params`]: masses, lengths, gravity and damping
//! - [`Mode`]: single or double pendulum
//! - [`StepIntegrable`]: stepping a state along its derivative
//! - [`DerivativeModel`]: equations of motion, see [`dynamics`]
//! - [`Observer`]: receives events and optionally returns control actions
//! - [`total_energy`] and [`positions`]: derived quantities of a state

mod angle;
pub mod dynamics;
mod energy;
mod kinematics;
mod mode;
mod observer;
mod params;
mod state;
mod step;

pub use angle::wrap_angle;
pub use dynamics::DerivativeModel;
pub use energy::{EnergyError, relative_drift, total_energy};
pub use kinematics::{Point, PositionError, Positions, positions};
pub use mode::{Mode, ParseModeError};
pub use observer::Observer;
pub use params::Params;
pub use state::{FIRST_SEGMENT_ANGLE, SECOND_SEGMENT_ANGLE, State, StateError};
pub use step::{DerivativeOf, StepIntegrable};
