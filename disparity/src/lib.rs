//! Depth to disparity conversion

#[macro_use]
extern crate log;

mod depth;
mod estimator;
mod map;
mod passes;

// Re-export
pub use depth::*;
pub use estimator::*;
pub use map::*;
pub use passes::*;
