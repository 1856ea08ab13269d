//! Numerical solvers for pendulum simulation.
//!
//! - [`transient`]: fixed-step integrators and adaptive sub-stepping

pub mod transient;
