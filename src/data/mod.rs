//! Input data sources that live outside the numeric core.
//!
//! Real MSD curves come from an upstream tracking pipeline; this module only
//! provides reproducible synthetic ones for demos and tests.

pub mod sample;

pub use sample::*;
