//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - validated input curves (`Curve`) and smoother output (`SmoothedCurve`)
//! - GSE output (`ModulusCurve`, `GseQuality`) and its configuration (`GseConfig`)
//! - Fischer model inputs/outputs (`FischerInput`, `FilmViscosity`)
//! - named physical defaults

pub mod types;

pub use types::*;
