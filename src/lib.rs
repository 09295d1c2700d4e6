//! `msd-rheology` library crate.
//!
//! Converts mean-squared displacements of tracked probe particles into
//! mechanical properties of the surrounding medium:
//!
//! - [`rheology::complex_modulus`]: G*(ω), G'(ω), G''(ω) via the Generalized
//!   Stokes–Einstein relation
//! - [`rheology::film_viscosity`]: thin-film viscosity via the Fischer model
//! - [`math::LogLogSmoother`]: the local log-log parabola fit both rely on
//!
//! The binary (`rheo`) is a thin wrapper around this library so the numeric
//! core stays testable without spawning processes.

pub mod app;
pub mod cli;
pub mod data;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod report;
pub mod rheology;
