//! Disparity estimation
//!
//! A point at depth `z` seen by two cameras `b` apart shifts by
//! `f * b / z` on the sensor. Converted to pixels with the sensor width `s`
//! and horizontal resolution `r` this gives
//!
//! ```text
//! disparity = (f * b * r) / (s * z)
//! ```

use crate::depth::*;
use crate::map::*;
use cameras::*;
use itertools::{Itertools, MinMaxResult};
use lfcore::error::*;
use lfcore::image_io::FloatImage;
use lfcore::numeric::Float;
use std::fmt;
use std::str::FromStr;

/// What to do with depth samples that are zero, negative or not finite.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum InvalidDepth {
    /// Store NaN.
    #[default]
    Nan,

    /// Store the given value.
    Fill(Float),

    /// Fail on the first invalid sample.
    Reject,
}

impl FromStr for InvalidDepth {
    type Err = Error;

    /// Parses `nan`, `reject` or `fill=<value>`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "nan" => Ok(Self::Nan),
            "reject" => Ok(Self::Reject),
            lower => {
                let value = lower
                    .strip_prefix("fill=")
                    .and_then(|v| v.trim().parse::<Float>().ok())
                    .ok_or_else(|| Error::UnknownKeyword {
                        name: "invalid depth policy",
                        token: s.to_string(),
                        reason: "expected nan, reject or fill=<value>",
                    })?;
                Ok(Self::Fill(value))
            }
        }
    }
}

impl fmt::Display for InvalidDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nan => write!(f, "nan"),
            Self::Fill(v) => write!(f, "fill={v}"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Converts depth maps into disparity maps for a camera array.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DisparityEstimator {
    /// Distance between adjacent cameras.
    baseline: Float,

    /// Camera parameters.
    intrinsics: CameraIntrinsics,

    /// Handling of invalid depth samples.
    policy: InvalidDepth,
}

impl DisparityEstimator {
    /// Creates a new estimator.
    ///
    /// * `baseline`   - Distance between adjacent cameras.
    /// * `intrinsics` - Camera parameters.
    pub fn new(baseline: Float, intrinsics: CameraIntrinsics) -> Result<Self> {
        Ok(Self {
            baseline: require_positive("baseline", baseline)?,
            intrinsics,
            policy: InvalidDepth::default(),
        })
    }

    /// Creates an estimator using the horizontal baseline of the light field
    /// settings.
    ///
    /// * `settings`   - Light field settings.
    /// * `intrinsics` - Camera parameters.
    pub fn for_settings(settings: &LightFieldSettings, intrinsics: CameraIntrinsics) -> Result<Self> {
        Self::new(settings.base_x(), intrinsics)
    }

    /// Returns the estimator with a different invalid depth policy.
    ///
    /// * `policy` - Handling of invalid depth samples.
    pub fn with_policy(self, policy: InvalidDepth) -> Self {
        Self { policy, ..self }
    }

    /// Returns the baseline.
    pub fn baseline(&self) -> Float {
        self.baseline
    }

    /// Returns the camera parameters.
    pub fn intrinsics(&self) -> &CameraIntrinsics {
        &self.intrinsics
    }

    /// Returns the invalid depth policy.
    pub fn policy(&self) -> InvalidDepth {
        self.policy
    }

    /// Returns the disparity of a single depth sample or `None` if the depth
    /// is invalid or so close to zero that the disparity is not finite.
    ///
    /// * `z` - Depth sample.
    #[inline]
    pub fn disparity(&self, z: Float) -> Option<Float> {
        if !is_valid_depth(z) {
            return None;
        }
        let f = self.intrinsics.focal_length();
        let s = self.intrinsics.sensor_width();
        let r = self.intrinsics.resolution_x() as Float;
        let d = (f * self.baseline * r) / (s * z);
        d.is_finite().then_some(d)
    }

    /// Computes the disparity of every pixel and the range over the valid
    /// ones.
    ///
    /// * `depth` - Depth map.
    pub fn estimate(&self, depth: &DepthMap) -> Result<DisparityMap> {
        let width = depth.width();
        let mut invalid_count = 0;
        let mut pixels = Vec::with_capacity(depth.image().pixels.len());
        let mut valid = Vec::with_capacity(pixels.capacity());

        for (i, &z) in depth.image().pixels.iter().enumerate() {
            let d = match (self.disparity(z), self.policy) {
                (Some(d), _) => {
                    valid.push(d);
                    d
                }
                (None, InvalidDepth::Reject) => {
                    return Err(Error::InvalidDepth {
                        x: i % width.max(1),
                        y: i / width.max(1),
                        value: z,
                    });
                }
                (None, InvalidDepth::Nan) => {
                    invalid_count += 1;
                    Float::NAN
                }
                (None, InvalidDepth::Fill(v)) => {
                    invalid_count += 1;
                    v
                }
            };
            pixels.push(d);
        }

        let range = match valid.into_iter().minmax() {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(d) => Some((d, d)),
            MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
        };

        if invalid_count > 0 {
            warn!(
                "{invalid_count} of {} depth samples are unusable ({})",
                pixels.len(),
                self.policy
            );
        }
        match range {
            Some((lo, hi)) => info!("Disparity range [{lo}, {hi}]"),
            None => warn!("No valid depth samples; disparity range is undefined"),
        }

        let image = FloatImage::new(pixels, width, depth.height())?;
        Ok(DisparityMap::new(
            image,
            range,
            depth.valid_range(),
            invalid_count,
        ))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
