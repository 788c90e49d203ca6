//! Light field camera array

#[macro_use]
extern crate log;

mod capture;
mod grid;
mod metadata;
mod pose_grid;
mod preview;
mod settings;
mod transform;

// Re-export
pub use capture::*;
pub use grid::*;
pub use metadata::*;
pub use pose_grid::*;
pub use preview::*;
pub use settings::*;
pub use transform::*;
