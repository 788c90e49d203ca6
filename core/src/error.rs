//! Errors

use crate::numeric::Float;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the light field crates.
#[derive(Debug, Error)]
pub enum Error {
    /// A camera grid with no rows or no columns.
    #[error("invalid grid {rows}x{cols}: rows and columns must be at least 1")]
    InvalidGrid { rows: usize, cols: usize },

    /// A scalar parameter outside its valid range.
    #[error("invalid {name} {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: Float,
        reason: &'static str,
    },

    /// A keyword that does not name any known option.
    #[error("invalid {name} '{token}': {reason}")]
    UnknownKeyword {
        name: &'static str,
        token: String,
        reason: &'static str,
    },

    /// A depth sample that cannot be converted to disparity.
    #[error("invalid depth {value} at pixel ({x}, {y})")]
    InvalidDepth { x: usize, y: usize, value: Float },

    /// Pixel buffer does not match the stated resolution.
    #[error("buffer of {actual} values does not match a {width}x{height} image")]
    ShapeMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },

    /// Decoding or encoding an image failed.
    #[error("image '{}': {reason}", .path.display())]
    Image { path: PathBuf, reason: String },

    /// The file extension does not name a supported image format.
    #[error("unsupported image format for '{}'", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Malformed capture metadata.
    #[error("metadata: {0}")]
    Metadata(String),

    /// File system error.
    #[error("'{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type used throughout the light field crates.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wraps an I/O error with the path it occurred on.
    ///
    /// * `path`   - The file or directory path.
    /// * `source` - The underlying error.
    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an image error.
    ///
    /// * `path`   - The image path.
    /// * `reason` - What went wrong.
    pub fn image<P: Into<PathBuf>, S: ToString>(path: P, reason: S) -> Self {
        Self::Image {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Returns `Ok(value)` when `value` is finite and strictly positive.
///
/// * `name`  - Parameter name used in the error message.
/// * `value` - The value to check.
pub fn require_positive(name: &'static str, value: Float) -> Result<Float> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            reason: "must be a finite positive number",
        })
    }
}

/// Returns `Ok(value)` when `value` is finite and not negative.
///
/// * `name`  - Parameter name used in the error message.
/// * `value` - The value to check.
pub fn require_non_negative(name: &'static str, value: Float) -> Result<Float> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            reason: "must be a finite non-negative number",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_positive_rejects_zero_and_nan() {
        assert!(require_positive("focal length", 0.0).is_err());
        assert!(require_positive("focal length", Float::NAN).is_err());
        assert_eq!(require_positive("focal length", 35.0).unwrap(), 35.0);
    }

    #[test]
    fn require_non_negative_accepts_zero() {
        assert_eq!(require_non_negative("base x", 0.0).unwrap(), 0.0);
        assert!(require_non_negative("base x", -1.0).is_err());
        assert!(require_non_negative("base x", Float::INFINITY).is_err());
    }

    #[test]
    fn messages_name_the_problem() {
        let e = Error::InvalidGrid { rows: 0, cols: 3 };
        assert_eq!(
            e.to_string(),
            "invalid grid 0x3: rows and columns must be at least 1"
        );
        let e = Error::InvalidDepth {
            x: 1,
            y: 2,
            value: 0.0,
        };
        assert_eq!(e.to_string(), "invalid depth 0 at pixel (1, 2)");
        let e = Error::UnknownKeyword {
            name: "direction",
            token: "sideways".to_string(),
            reason: "expected left, right, up or down",
        };
        assert_eq!(
            e.to_string(),
            "invalid direction 'sideways': expected left, right, up or down"
        );
    }
}
