//! 3-D Vectors

use super::Float;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A displacement in world space.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Vector3f {
    /// Creates a new vector.
    ///
    /// * `x` - X-component.
    /// * `y` - Y-component.
    /// * `z` - Z-component.
    pub const fn new(x: Float, y: Float, z: Float) -> Self {
        Self { x, y, z }
    }

    /// Returns the zero vector.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Returns the dot product with another vector.
    ///
    /// * `other` - The other vector.
    pub fn dot(&self, other: &Self) -> Float {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length_squared(&self) -> Float {
        self.dot(self)
    }

    pub fn length(&self) -> Float {
        self.length_squared().sqrt()
    }
}

/// Implements a component-wise binary operator and its assigning form.
macro_rules! componentwise {
    ($op: ident, $f: ident, $op_assign: ident, $f_assign: ident, $sym: tt) => {
        impl $op for Vector3f {
            type Output = Self;

            fn $f(self, other: Self) -> Self {
                Self::new(self.x $sym other.x, self.y $sym other.y, self.z $sym other.z)
            }
        }

        impl $op_assign for Vector3f {
            fn $f_assign(&mut self, other: Self) {
                *self = *self $sym other;
            }
        }
    };
}

componentwise!(Add, add, AddAssign, add_assign, +);
componentwise!(Sub, sub, SubAssign, sub_assign, -);

impl Mul<Float> for Vector3f {
    type Output = Self;

    fn mul(self, s: Float) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Neg for Vector3f {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vector3f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
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
        fn vector3f()(x in -100.0..100.0f32, y in -100.0..100.0f32, z in -100.0..100.0f32) -> Vector3f {
            Vector3f::new(x, y, z)
        }
    }

    #[test]
    fn zero_vector() {
        assert_eq!(Vector3f::zero(), Vector3f::default());
        assert_eq!(Vector3f::zero().length(), 0.0);
    }

    #[test]
    fn length_of_pythagorean_quadruple() {
        let v = Vector3f::new(2.0, -3.0, 6.0);
        assert_eq!(v.length_squared(), 49.0);
        assert_eq!(v.length(), 7.0);
        assert_eq!(v.dot(&-v), -49.0);
    }

    #[test]
    fn display() {
        assert_eq!(Vector3f::new(1.0, -0.5, 2.0).to_string(), "[1, -0.5, 2]");
    }

    proptest! {
        #[test]
        fn length_scales_linearly(v in vector3f(), s in -10.0..10.0f32) {
            let expected = v.length() * s.abs();
            prop_assert!(approx_eq!(Float, (v * s).length(), expected, epsilon = 1e-3 * expected.max(1.0)));
        }

        #[test]
        fn sub_undoes_add(a in vector3f(), b in vector3f()) {
            let mut r = a + b;
            r -= b;
            prop_assert!(approx_eq!(Float, r.x, a.x, epsilon = 1e-3));
            prop_assert!(approx_eq!(Float, r.y, a.y, epsilon = 1e-3));
            prop_assert!(approx_eq!(Float, r.z, a.z, epsilon = 1e-3));
        }

        #[test]
        fn negation_reverses_dot(a in vector3f(), b in vector3f()) {
            prop_assert_eq!((-a).dot(&b), -(a.dot(&b)));
            prop_assert_eq!(a.dot(&b), b.dot(&a));
        }
    }
}
