//! Configuration models and file loading for the Lumen recall core.
//!
//! This crate owns the recall config schema, defaults, and validation used
//! when the surrounding application wires up the pipeline.

mod error;
mod loader;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Configuration schema models.
pub use model::*;
