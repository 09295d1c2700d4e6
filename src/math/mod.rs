//! Mathematical utilities: weighted least squares and log-log smoothing.

pub mod ols;
pub mod smoothing;

pub use ols::*;
pub use smoothing::*;
