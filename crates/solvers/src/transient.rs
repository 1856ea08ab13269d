//! Time integration of pendulum states.
//!
//! A state is advanced by a requested time increment in two layers:
//!
//! - [`rk4`] and [`symplectic_euler`] advance a state by one small step.
//!   Both are pure and bit-reproducible for identical inputs.
//! - [`adaptive`] picks a safe sub-step bound from the current angular
//!   speed and splits the requested increment into equal sub-steps, each
//!   taken with the active [`Integrator`].

pub mod adaptive;
mod integrator;
pub mod rk4;
pub mod symplectic_euler;

pub use integrator::{Integrator, ParseIntegratorError};
