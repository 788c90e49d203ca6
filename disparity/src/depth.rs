//! Depth maps

use itertools::{Itertools, MinMaxResult};
use lfcore::error::*;
use lfcore::image_io::*;
use lfcore::numeric::Float;
use std::path::Path;

/// Returns true if a depth sample can be turned into disparity: finite and
/// strictly positive.
///
/// * `z` - Depth sample.
#[inline]
pub fn is_valid_depth(z: Float) -> bool {
    z.is_finite() && z > 0.0
}

/// Scene-space depth per pixel of a rendered view.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthMap {
    /// Depth samples.
    image: FloatImage,
}

impl DepthMap {
    /// Creates a depth map from row-major samples, top row first.
    ///
    /// * `pixels` - Depth samples, `width * height` values.
    /// * `width`  - Width of map.
    /// * `height` - Height of map.
    pub fn new(pixels: Vec<Float>, width: usize, height: usize) -> Result<Self> {
        FloatImage::new(pixels, width, height).map(Self::from)
    }

    /// Reads a depth map from an OpenEXR, PFM or NPY file.
    ///
    /// * `path` - Input file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        read_float_image(path).map(Self::from)
    }

    /// Returns the depth samples.
    pub fn image(&self) -> &FloatImage {
        &self.image
    }

    /// Returns the width.
    pub fn width(&self) -> usize {
        self.image.width
    }

    /// Returns the height.
    pub fn height(&self) -> usize {
        self.image.height
    }

    /// Returns the depth at (x, y).
    ///
    /// * `x` - Column.
    /// * `y` - Row.
    pub fn get(&self, x: usize, y: usize) -> Float {
        self.image.get(x, y)
    }

    /// Returns the nearest and farthest valid depth, or `None` if no sample is
    /// valid.
    pub fn valid_range(&self) -> Option<(Float, Float)> {
        match self
            .image
            .pixels
            .iter()
            .copied()
            .filter(|&z| is_valid_depth(z))
            .minmax()
        {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(z) => Some((z, z)),
            MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
        }
    }
}

impl From<FloatImage> for DepthMap {
    fn from(image: FloatImage) -> Self {
        Self { image }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
