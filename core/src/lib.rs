//! Core
//!
//! Numeric helpers, 3-D geometry, errors and image I/O shared by the light
//! field crates.

#[macro_use]
extern crate log;

// Re-export.
pub mod error;
pub mod fileutil;
pub mod geometry;
pub mod image_io;
pub mod numeric;

pub use error::{Error, Result};
