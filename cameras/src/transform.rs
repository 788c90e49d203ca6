//! Camera transform and intrinsics

use lfcore::error::*;
use lfcore::geometry::*;

/// World placement of the camera.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CameraTransform {
    /// Camera location.
    pub position: Point3f,

    /// Camera orientation. Columns are the camera's local axes in world
    /// space and may carry object scale.
    pub orientation: Matrix3x3,
}

impl CameraTransform {
    /// Creates a new camera transform.
    ///
    /// * `position`    - Camera location.
    /// * `orientation` - Camera orientation.
    pub fn new(position: Point3f, orientation: Matrix3x3) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Creates a camera transform from a location and XYZ Euler angles.
    ///
    /// * `position` - Camera location.
    /// * `rotation` - Euler angles about x, y and z in degrees.
    pub fn from_euler(position: Point3f, rotation: [Float; 3]) -> Self {
        Self::new(
            position,
            Matrix3x3::from_euler_xyz(rotation[0], rotation[1], rotation[2]),
        )
    }

    /// Returns the same orientation at a different location.
    ///
    /// * `position` - The new location.
    pub fn moved_to(&self, position: Point3f) -> Self {
        Self::new(position, self.orientation)
    }

    /// Returns the unit directions along which the array spreads its columns
    /// and rows: the camera's -x axis and +y axis, with scale removed.
    pub fn array_axes(&self) -> (Vector3f, Vector3f) {
        let r = self.orientation.normalized();
        (
            r * Vector3f::new(-1.0, 0.0, 0.0),
            r * Vector3f::new(0.0, 1.0, 0.0),
        )
    }
}

/// Pinhole camera parameters needed to turn depth into disparity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraIntrinsics {
    /// Focal length in millimeters.
    focal_length: Float,

    /// Sensor width in millimeters.
    sensor_width: Float,

    /// Horizontal resolution in pixels.
    resolution_x: usize,
}

impl CameraIntrinsics {
    /// Creates new camera intrinsics. All values must be positive.
    ///
    /// * `focal_length` - Focal length in millimeters.
    /// * `sensor_width` - Sensor width in millimeters.
    /// * `resolution_x` - Horizontal resolution in pixels.
    pub fn new(focal_length: Float, sensor_width: Float, resolution_x: usize) -> Result<Self> {
        let focal_length = require_positive("focal length", focal_length)?;
        let sensor_width = require_positive("sensor width", sensor_width)?;
        if resolution_x == 0 {
            return Err(Error::InvalidParameter {
                name: "horizontal resolution",
                value: 0.0,
                reason: "must be at least 1 pixel",
            });
        }
        Ok(Self {
            focal_length,
            sensor_width,
            resolution_x,
        })
    }

    /// Returns the focal length in millimeters.
    pub fn focal_length(&self) -> Float {
        self.focal_length
    }

    /// Returns the sensor width in millimeters.
    pub fn sensor_width(&self) -> Float {
        self.sensor_width
    }

    /// Returns the horizontal resolution in pixels.
    pub fn resolution_x(&self) -> usize {
        self.resolution_x
    }

    /// Returns the focal length expressed in pixels, `f * r / s`.
    pub fn focal_length_px(&self) -> Float {
        self.focal_length * self.resolution_x as Float / self.sensor_width
    }
}

impl Default for CameraIntrinsics {
    /// A 50mm lens on a 36mm sensor rendered 1920 pixels wide.
    fn default() -> Self {
        Self {
            focal_length: 50.0,
            sensor_width: 36.0,
            resolution_x: 1920,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn identity_camera_axes() {
        let cam = CameraTransform::default();
        let (x, y) = cam.array_axes();
        assert_eq!(x, Vector3f::new(-1.0, 0.0, 0.0));
        assert_eq!(y, Vector3f::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn axes_ignore_object_scale() {
        let cam = CameraTransform::new(
            Point3f::zero(),
            Matrix3x3::rotate_z(90.0) * Matrix3x3::scale(4.0, 4.0, 4.0),
        );
        let (x, y) = cam.array_axes();
        assert!(approx_eq!(Float, x.length(), 1.0, epsilon = 1e-5));
        // -x rotated a quarter turn about z points along -y.
        assert!(approx_eq!(Float, x.y, -1.0, epsilon = 1e-5));
        assert!(approx_eq!(Float, y.x, -1.0, epsilon = 1e-5));
    }

    #[test]
    fn moved_to_keeps_orientation() {
        let cam = CameraTransform::from_euler(Point3f::zero(), [10.0, 20.0, 30.0]);
        let moved = cam.moved_to(Point3f::new(1.0, 2.0, 3.0));
        assert_eq!(moved.orientation, cam.orientation);
        assert_eq!(moved.position, Point3f::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn intrinsics_validation() {
        assert!(CameraIntrinsics::new(0.0, 36.0, 100).is_err());
        assert!(CameraIntrinsics::new(50.0, -1.0, 100).is_err());
        assert!(CameraIntrinsics::new(50.0, 36.0, 0).is_err());
        let k = CameraIntrinsics::new(50.0, 36.0, 1920).unwrap();
        assert!(approx_eq!(Float, k.focal_length_px(), 50.0 * 1920.0 / 36.0, ulps = 2));
    }
}
