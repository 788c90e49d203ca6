//! Geometry

mod matrix3x3;
mod point3;
mod vector3;

// Re-export
pub use crate::numeric::*;
pub use matrix3x3::*;
pub use point3::*;
pub use vector3::*;
