//! Camera array poses

use crate::grid::*;
use crate::settings::*;
use crate::transform::*;
use lfcore::geometry::*;

/// One camera of the array.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pose {
    /// Linear index.
    pub index: usize,

    /// Row and column.
    pub coord: (usize, usize),

    /// Camera location.
    pub position: Point3f,
}

impl Pose {
    /// Returns the file stem used for this camera's render, `"{row:02}_{col:02}"`.
    pub fn stem(&self) -> String {
        format!("{:02}_{:02}", self.coord.0, self.coord.1)
    }
}

/// Camera locations of a light field array. The array is centered on the
/// camera; column `0` sits at `center - dx` and the last column at
/// `center + dx`, rows likewise with `dy`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PoseGrid {
    /// Location of the original camera.
    center: Point3f,

    /// Half extent along the columns.
    dx: Vector3f,

    /// Half extent along the rows.
    dy: Vector3f,

    /// Rows and columns.
    grid: Grid,
}

impl PoseGrid {
    /// Builds the array for a camera.
    ///
    /// * `camera`   - Current camera placement.
    /// * `settings` - Light field settings.
    pub fn new(camera: &CameraTransform, settings: &LightFieldSettings) -> Self {
        let (x_axis, y_axis) = camera.array_axes();
        Self::from_parts(
            camera.position,
            x_axis * settings.base_x(),
            y_axis * settings.base_y(),
            settings.grid(),
        )
    }

    /// Builds the array from explicit displacement vectors.
    ///
    /// * `center` - Array center.
    /// * `dx`     - Column displacement.
    /// * `dy`     - Row displacement.
    /// * `grid`   - Rows and columns.
    pub fn from_parts(center: Point3f, dx: Vector3f, dy: Vector3f, grid: Grid) -> Self {
        Self {
            center,
            dx,
            dy,
            grid,
        }
    }

    /// Returns the number of cameras.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.grid.len()
    }

    /// Returns the array center.
    pub fn center(&self) -> Point3f {
        self.center
    }

    /// Returns the column displacement.
    pub fn dx(&self) -> Vector3f {
        self.dx
    }

    /// Returns the row displacement.
    pub fn dy(&self) -> Vector3f {
        self.dy
    }

    /// Returns the rows and columns.
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Clamps a signed coordinate into the grid.
    ///
    /// * `s` - Row.
    /// * `t` - Column.
    pub fn clamp(&self, s: isize, t: isize) -> (usize, usize) {
        self.grid.clamp(s, t)
    }

    /// Converts a linear index into a (row, column) coordinate.
    ///
    /// * `index` - Linear index.
    pub fn index_to_coord(&self, index: usize) -> (usize, usize) {
        self.grid.index_to_coord(index)
    }

    /// Converts a (row, column) coordinate into a linear index.
    ///
    /// * `s` - Row.
    /// * `t` - Column.
    pub fn coord_to_index(&self, s: usize, t: usize) -> usize {
        self.grid.coord_to_index(s, t)
    }

    /// Returns the camera location for a linear index.
    ///
    /// * `index` - Linear index.
    pub fn position_at(&self, index: usize) -> Point3f {
        let (s, t) = self.index_to_coord(index);
        self.position_at_coord(s, t)
    }

    /// Returns the camera location at a grid coordinate. Coordinates outside
    /// the grid are clamped.
    ///
    /// * `s` - Row.
    /// * `t` - Column.
    pub fn position_at_coord(&self, s: usize, t: usize) -> Point3f {
        let (s, t) = self.grid.clamp(
            s.min(isize::MAX as usize) as isize,
            t.min(isize::MAX as usize) as isize,
        );
        let col_offset = self.dx * symmetric_offset(t, self.grid.cols());
        let row_offset = self.dy * symmetric_offset(s, self.grid.rows());
        self.center + row_offset + col_offset
    }

    /// Returns the pose for a linear index.
    ///
    /// * `index` - Linear index.
    pub fn pose(&self, index: usize) -> Pose {
        Pose {
            index,
            coord: self.index_to_coord(index),
            position: self.position_at(index),
        }
    }

    /// Returns all poses in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Pose> + '_ {
        (0..self.len()).map(move |i| self.pose(i))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
