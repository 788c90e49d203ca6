//! 3-D Points

use super::{Float, Vector3f};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A location in world space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Point3f {
    /// Creates a new point.
    ///
    /// * `x` - X-coordinate.
    /// * `y` - Y-coordinate.
    /// * `z` - Z-coordinate.
    pub const fn new(x: Float, y: Float, z: Float) -> Self {
        Self { x, y, z }
    }

    /// Returns the origin.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Returns the distance to another point.
    ///
    /// * `other` - The other point.
    pub fn distance(self, other: Self) -> Float {
        (self - other).length()
    }
}

impl Add<Vector3f> for Point3f {
    type Output = Self;

    fn add(self, v: Vector3f) -> Self {
        Self::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}

impl AddAssign<Vector3f> for Point3f {
    fn add_assign(&mut self, v: Vector3f) {
        *self = *self + v;
    }
}

impl Sub<Vector3f> for Point3f {
    type Output = Self;

    fn sub(self, v: Vector3f) -> Self {
        self + -v
    }
}

impl SubAssign<Vector3f> for Point3f {
    fn sub_assign(&mut self, v: Vector3f) {
        *self = *self - v;
    }
}

impl Sub for Point3f {
    type Output = Vector3f;

    /// Returns the displacement from `other` to this point.
    fn sub(self, other: Self) -> Vector3f {
        Vector3f::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl From<[Float; 3]> for Point3f {
    fn from([x, y, z]: [Float; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for Point3f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    prop_compose! {
        fn point3f()(x in -100.0..100.0f32, y in -100.0..100.0f32, z in -100.0..100.0f32) -> Point3f {
            Point3f::new(x, y, z)
        }
    }

    prop_compose! {
        fn vector3f()(x in -100.0..100.0f32, y in -100.0..100.0f32, z in -100.0..100.0f32) -> Vector3f {
            Vector3f::new(x, y, z)
        }
    }

    #[test]
    fn origin() {
        assert_eq!(Point3f::zero(), Point3f::default());
        assert_eq!(Point3f::from([1.0, 2.0, 3.0]), Point3f::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn distance_of_pythagorean_triple() {
        let a = Point3f::new(1.0, 1.0, 1.0);
        let b = Point3f::new(4.0, 5.0, 1.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!((b - a).length_squared(), 25.0);
    }

    #[test]
    fn display() {
        assert_eq!(Point3f::new(0.0, -5.0, 1.5).to_string(), "(0, -5, 1.5)");
    }

    proptest! {
        #[test]
        fn difference_recovers_displacement(p in point3f(), v in vector3f()) {
            let d = (p + v) - p;
            prop_assert!(approx_eq!(Float, d.x, v.x, epsilon = 1e-3));
            prop_assert!(approx_eq!(Float, d.y, v.y, epsilon = 1e-3));
            prop_assert!(approx_eq!(Float, d.z, v.z, epsilon = 1e-3));
        }

        #[test]
        fn distance_to_self_is_zero(p in point3f()) {
            prop_assert_eq!(p.distance(p), 0.0);
        }

        #[test]
        fn assigning_ops_match(p in point3f(), v in vector3f()) {
            let mut q = p;
            q += v;
            prop_assert_eq!(q, p + v);
            q -= v;
            prop_assert_eq!(q, (p + v) - v);
        }
    }
}
