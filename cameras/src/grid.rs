//! Camera array grid

use lfcore::error::*;
use lfcore::numeric::clamp_index;

/// Rows and columns of the camera array. Linear indices are row-major, rows
/// outer: `index = s * cols + t`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    /// Number of rows (S).
    rows: usize,

    /// Number of columns (T).
    cols: usize,
}

impl Grid {
    /// Creates a new grid. Both dimensions must be at least 1.
    ///
    /// * `rows` - Number of rows.
    /// * `cols` - Number of columns.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidGrid { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    /// A single camera.
    pub fn single() -> Self {
        Self { rows: 1, cols: 1 }
    }

    /// Returns the number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns the number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the number of cameras in the array.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Clamps a signed coordinate into the grid.
    ///
    /// * `s` - Row.
    /// * `t` - Column.
    pub fn clamp(&self, s: isize, t: isize) -> (usize, usize) {
        (clamp_index(s, self.rows), clamp_index(t, self.cols))
    }

    /// Converts a linear index into a (row, column) coordinate.
    ///
    /// * `index` - Linear index.
    pub fn index_to_coord(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }

    /// Converts a (row, column) coordinate into a linear index.
    ///
    /// * `s` - Row.
    /// * `t` - Column.
    pub fn coord_to_index(&self, s: usize, t: usize) -> usize {
        s * self.cols + t
    }

    /// Returns the middle coordinate, rounding down for even sizes.
    pub fn middle(&self) -> (usize, usize) {
        (self.rows / 2, self.cols / 2)
    }

    /// Returns all coordinates in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.len()).map(|i| self.index_to_coord(i))
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::single()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_empty_dimensions() {
        assert!(matches!(
            Grid::new(0, 3),
            Err(Error::InvalidGrid { rows: 0, cols: 3 })
        ));
        assert!(Grid::new(3, 0).is_err());
        assert!(Grid::new(0, 0).is_err());
    }

    #[test]
    fn row_major_order() {
        let grid = Grid::new(2, 3).unwrap();
        let coords: Vec<_> = grid.coords().collect();
        assert_eq!(
            coords,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
        );
    }

    #[test]
    fn clamp_out_of_range() {
        let grid = Grid::new(3, 5).unwrap();
        assert_eq!(grid.clamp(-1, -7), (0, 0));
        assert_eq!(grid.clamp(3, 5), (2, 4));
        assert_eq!(grid.clamp(10, 2), (2, 2));
    }

    #[test]
    fn middle_of_even_and_odd() {
        assert_eq!(Grid::new(3, 5).unwrap().middle(), (1, 2));
        assert_eq!(Grid::new(4, 2).unwrap().middle(), (2, 1));
        assert_eq!(Grid::single().middle(), (0, 0));
    }

    prop_compose! {
        fn grid_strategy()(rows in 1usize..20, cols in 1usize..20) -> Grid {
            Grid::new(rows, cols).unwrap()
        }
    }

    proptest! {
        #[test]
        fn coord_round_trip(grid in grid_strategy(), s in 0usize..20, t in 0usize..20) {
            let (s, t) = (s % grid.rows(), t % grid.cols());
            prop_assert_eq!(grid.index_to_coord(grid.coord_to_index(s, t)), (s, t));
        }

        #[test]
        fn index_round_trip(grid in grid_strategy(), i in 0usize..400) {
            let i = i % grid.len();
            let (s, t) = grid.index_to_coord(i);
            prop_assert!(s < grid.rows() && t < grid.cols());
            prop_assert_eq!(grid.coord_to_index(s, t), i);
        }

        #[test]
        fn clamp_is_idempotent(grid in grid_strategy(), s in -30isize..30, t in -30isize..30) {
            let (cs, ct) = grid.clamp(s, t);
            prop_assert!(cs < grid.rows() && ct < grid.cols());
            prop_assert_eq!(grid.clamp(cs as isize, ct as isize), (cs, ct));
        }

        #[test]
        fn clamp_keeps_valid_coords(grid in grid_strategy(), s in 0usize..20, t in 0usize..20) {
            let (s, t) = (s % grid.rows(), t % grid.cols());
            prop_assert_eq!(grid.clamp(s as isize, t as isize), (s, t));
        }

        #[test]
        fn clamp_returns_nearest(grid in grid_strategy(), s in -30isize..30, t in -30isize..30) {
            let (cs, ct) = grid.clamp(s, t);
            let nearest = |v: isize, n: usize| v.max(0).min(n as isize - 1) as usize;
            prop_assert_eq!((cs, ct), (nearest(s, grid.rows()), nearest(t, grid.cols())));
        }
    }
}
