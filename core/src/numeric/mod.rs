//! Numeric types and helpers shared by all crates

mod clamp;
mod common;

// Re-export
pub use clamp::*;
pub use common::*;
