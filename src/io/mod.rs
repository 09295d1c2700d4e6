//! Input/output helpers.
//!
//! - MSD CSV ingest + validation (`ingest`)
//! - result exports (CSV/JSON) and config loading (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
