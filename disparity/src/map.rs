//! Disparity maps

use cameras::*;
use lfcore::error::*;
use lfcore::image_io::*;
use lfcore::numeric::Float;
use std::path::Path;

/// Disparity per pixel and summary of an estimate.
#[derive(Clone, Debug, PartialEq)]
pub struct DisparityMap {
    /// Disparity in pixels.
    image: FloatImage,

    /// Smallest and largest disparity over valid pixels.
    range: Option<(Float, Float)>,

    /// Nearest and farthest valid depth of the input.
    depth_range: Option<(Float, Float)>,

    /// Number of pixels whose depth was invalid.
    invalid_count: usize,
}

impl DisparityMap {
    /// Creates a new disparity map.
    ///
    /// * `image`         - Disparity in pixels.
    /// * `range`         - Disparity range over valid pixels.
    /// * `depth_range`   - Depth range over valid pixels.
    /// * `invalid_count` - Number of invalid pixels.
    pub fn new(
        image: FloatImage,
        range: Option<(Float, Float)>,
        depth_range: Option<(Float, Float)>,
        invalid_count: usize,
    ) -> Self {
        Self {
            image,
            range,
            depth_range,
            invalid_count,
        }
    }

    /// Returns the disparity image.
    pub fn image(&self) -> &FloatImage {
        &self.image
    }

    /// Returns the (min, max) disparity over valid pixels, or `None` if no
    /// pixel had a valid depth.
    pub fn range(&self) -> Option<(Float, Float)> {
        self.range
    }

    /// Returns the (nearest, farthest) valid depth.
    pub fn depth_range(&self) -> Option<(Float, Float)> {
        self.depth_range
    }

    /// Returns the number of pixels with invalid depth.
    pub fn invalid_count(&self) -> usize {
        self.invalid_count
    }

    /// Writes the disparity image. The format follows the file extension.
    ///
    /// * `path` - Output file path.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        write_float_image(path, &self.image)
    }

    /// Records the disparity range on the light field settings. Settings are
    /// returned unchanged when the range is undefined.
    ///
    /// * `settings` - Light field settings.
    pub fn apply_to(&self, settings: LightFieldSettings) -> LightFieldSettings {
        match self.range {
            Some((lo, hi)) => settings.with_disparity_range(lo, hi),
            None => {
                warn!("Keeping disparity range [{}, {}]", settings.min_disp(), settings.max_disp());
                settings
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn map(range: Option<(Float, Float)>) -> DisparityMap {
        let image = FloatImage::new(vec![1.0, 2.0, Float::NAN, 4.0], 2, 2).unwrap();
        DisparityMap::new(image, range, Some((0.5, 2.0)), 1)
    }

    #[test]
    fn apply_to_writes_back_range() {
        let settings = LightFieldSettings::new(3, 3, 0.1, 0.1).unwrap();
        let updated = map(Some((1.0, 4.0))).apply_to(settings);
        assert_eq!(updated.min_disp(), 1.0);
        assert_eq!(updated.max_disp(), 4.0);
        assert!(updated.has_disparity_range());
        assert_eq!(updated.grid(), settings.grid());
    }

    #[test]
    fn apply_to_without_range_keeps_settings() {
        let settings = LightFieldSettings::new(3, 3, 0.1, 0.1)
            .unwrap()
            .with_disparity_range(2.0, 3.0);
        assert_eq!(map(None).apply_to(settings), settings);
    }

    #[test]
    fn write_npy() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("disparity.npy");
        let m = map(Some((1.0, 4.0)));
        m.write(&path).unwrap();

        let back = read_float_image(&path).unwrap();
        assert_eq!((back.width, back.height), (2, 2));
        assert_eq!(back.pixels[3], 4.0);
        assert!(back.pixels[2].is_nan());
    }

    #[test]
    fn write_unknown_extension_fails() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(map(None).write(tmp.path().join("disparity.bmp")).is_err());
    }
}
