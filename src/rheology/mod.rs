//! Physical models built on top of the log-log smoother.
//!
//! - `fischer`: thin-film viscosity from a single diffusivity measurement
//! - `gse`: complex shear modulus G*(ω) from an MSD curve
//! - `power_law`: global power-law fit of an MSD (diffusivity estimate)

pub mod fischer;
pub mod gse;
pub mod power_law;

pub use fischer::*;
pub use gse::*;
pub use power_law::*;
