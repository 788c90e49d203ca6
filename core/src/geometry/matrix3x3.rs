//! 3x3 Matrix

use super::{radians, Float, Vector3f};
use std::ops::{Index, Mul};

/// A 3x3 matrix containing Float values. Used for camera orientation, where
/// the columns are the camera's local axes expressed in world space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix3x3 {
    /// Stores a 2-D array of Float
    pub m: [[Float; 3]; 3],
}

/// Zero matrix.
pub const ZERO_MATRIX3: Matrix3x3 = Matrix3x3 { m: [[0.0; 3]; 3] };

/// Identity matrix.
pub const IDENTITY_MATRIX3: Matrix3x3 = Matrix3x3 {
    m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
};

/// Create a 3x3 matrix using the following order of the parameters:
///
/// * `t00`, `t01`, `t02` - Row 1
/// * `t10`, `t11`, `t12` - Row 2
/// * `t20`, `t21`, `t22` - Row 3
#[rustfmt::skip]
pub fn matrix3x3(
    t00: Float, t01: Float, t02: Float,
    t10: Float, t11: Float, t12: Float,
    t20: Float, t21: Float, t22: Float,
) -> Matrix3x3 {
    Matrix3x3 {
        m: [
            [t00, t01, t02],
            [t10, t11, t12],
            [t20, t21, t22],
        ],
    }
}

#[rustfmt::skip]
impl Matrix3x3 {
    /// Returns a rotation about the x-axis.
    ///
    /// * `theta` - Angle in degrees.
    pub fn rotate_x(theta: Float) -> Matrix3x3 {
        let (sin_theta, cos_theta) = radians(theta).sin_cos();
        matrix3x3(
            1.0,       0.0,        0.0,
            0.0, cos_theta, -sin_theta,
            0.0, sin_theta,  cos_theta,
        )
    }

    /// Returns a rotation about the y-axis.
    ///
    /// * `theta` - Angle in degrees.
    pub fn rotate_y(theta: Float) -> Matrix3x3 {
        let (sin_theta, cos_theta) = radians(theta).sin_cos();
        matrix3x3(
             cos_theta, 0.0, sin_theta,
                   0.0, 1.0,       0.0,
            -sin_theta, 0.0, cos_theta,
        )
    }

    /// Returns a rotation about the z-axis.
    ///
    /// * `theta` - Angle in degrees.
    pub fn rotate_z(theta: Float) -> Matrix3x3 {
        let (sin_theta, cos_theta) = radians(theta).sin_cos();
        matrix3x3(
            cos_theta, -sin_theta, 0.0,
            sin_theta,  cos_theta, 0.0,
                  0.0,        0.0, 1.0,
        )
    }

    /// Returns the rotation for XYZ Euler angles, i.e. x is applied first
    /// and z last (`Rz * Ry * Rx`).
    ///
    /// * `x` - Angle about the x-axis in degrees.
    /// * `y` - Angle about the y-axis in degrees.
    /// * `z` - Angle about the z-axis in degrees.
    pub fn from_euler_xyz(x: Float, y: Float, z: Float) -> Matrix3x3 {
        Self::rotate_z(z) * Self::rotate_y(y) * Self::rotate_x(x)
    }

    /// Returns a diagonal scale matrix.
    ///
    /// * `sx` - Scale along x.
    /// * `sy` - Scale along y.
    /// * `sz` - Scale along z.
    pub fn scale(sx: Float, sy: Float, sz: Float) -> Matrix3x3 {
        matrix3x3(
             sx, 0.0, 0.0,
            0.0,  sy, 0.0,
            0.0, 0.0,  sz,
        )
    }

    /// Returns the given column as a vector.
    ///
    /// * `col` - Column index in [0, 2].
    pub fn column(&self, col: usize) -> Vector3f {
        assert!(col < 3, "matrix column not in [0, 2]");
        Vector3f::new(self.m[0][col], self.m[1][col], self.m[2][col])
    }

    /// Returns a copy with every column scaled to unit length. For a
    /// rotation-scale matrix this strips the scale and leaves the rotation.
    /// Zero columns are left untouched.
    pub fn normalized(&self) -> Matrix3x3 {
        let mut r = *self;
        for col in 0..3 {
            let len = self.column(col).length();
            if len > 0.0 {
                for row in 0..3 {
                    r.m[row][col] /= len;
                }
            }
        }
        r
    }
}

impl Default for Matrix3x3 {
    /// Returns the default as identity matrix.
    fn default() -> Self {
        IDENTITY_MATRIX3
    }
}

impl Mul<Matrix3x3> for Matrix3x3 {
    type Output = Matrix3x3;

    /// Post-multiply the given matrix.
    ///
    /// * `other` - The other matrix
    fn mul(self, other: Matrix3x3) -> Self::Output {
        let mut m = ZERO_MATRIX3;

        for i in 0..3 {
            for j in 0..3 {
                m.m[i][j] = self.m[i][0] * other.m[0][j]
                    + self.m[i][1] * other.m[1][j]
                    + self.m[i][2] * other.m[2][j];
            }
        }

        m
    }
}

impl Mul<Vector3f> for Matrix3x3 {
    type Output = Vector3f;

    /// Transforms a vector.
    ///
    /// * `v` - The vector.
    fn mul(self, v: Vector3f) -> Self::Output {
        Vector3f::new(
            self.m[0][0] * v.x + self.m[0][1] * v.y + self.m[0][2] * v.z,
            self.m[1][0] * v.x + self.m[1][1] * v.y + self.m[1][2] * v.z,
            self.m[2][0] * v.x + self.m[2][1] * v.y + self.m[2][2] * v.z,
        )
    }
}

impl Mul<Vector3f> for &Matrix3x3 {
    type Output = Vector3f;

    /// Transforms a vector.
    ///
    /// * `v` - The vector.
    fn mul(self, v: Vector3f) -> Self::Output {
        *self * v
    }
}

impl Index<usize> for Matrix3x3 {
    type Output = [Float; 3];

    /// Index the matrix row. The column can be further indexed from the
    /// returned result.
    ///
    /// * `row` - Row
    fn index(&self, row: usize) -> &Self::Output {
        assert!(row < 3, "matrix row not in [0, 2]");
        &self.m[row]
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
